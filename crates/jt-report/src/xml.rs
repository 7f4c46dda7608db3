use std::borrow::Cow;
use std::fmt::Display;
use std::io::Write;

use crate::XmlError;

pub const XML_DECLARATION: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\" ?>";

/// How attribute values and text are written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Escaping {
    /// Values are written exactly as given.
    #[default]
    Verbatim,
    /// `& < > " '` are replaced by entities.
    Xml,
}

impl Escaping {
    fn apply<'a>(&self, value: &'a str) -> Cow<'a, str> {
        match self {
            Self::Verbatim => Cow::Borrowed(value),
            Self::Xml => escape_xml(value),
        }
    }
}

fn escape_xml(value: &str) -> Cow<'_, str> {
    if !value.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(value);
    }
    let mut out = String::with_capacity(value.len() + 8);
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            other => out.push(other),
        }
    }
    Cow::Owned(out)
}

/// Streaming writer for nested elements.
///
/// Each `start`/`text`/closing tag goes on its own line, indented with one tab
/// per open ancestor. An element with neither children nor text is closed as
/// `<name/>`.
#[derive(Debug)]
pub struct XmlRenderer<W: Write> {
    writer: W,
    elements: Vec<String>,
    open: bool,
    escaping: Escaping,
}

impl<W: Write> XmlRenderer<W> {
    pub fn new(writer: W) -> Result<Self, XmlError> {
        Self::with_escaping(writer, Escaping::Verbatim)
    }

    pub fn with_escaping(mut writer: W, escaping: Escaping) -> Result<Self, XmlError> {
        writer.write_all(XML_DECLARATION.as_bytes())?;
        Ok(Self {
            writer,
            elements: Vec::new(),
            open: false,
            escaping,
        })
    }

    pub fn depth(&self) -> usize {
        self.elements.len()
    }

    pub fn start(&mut self, name: &str) -> Result<&mut Self, XmlError> {
        self.close_start_tag()?;
        self.indent()?;
        write!(self.writer, "<{}", name)?;
        self.elements.push(name.to_string());
        self.open = true;
        Ok(self)
    }

    pub fn attr(&mut self, name: &str, value: impl Display) -> Result<&mut Self, XmlError> {
        if !self.open {
            return Err(XmlError::InvalidState(format!(
                "attribute \"{}\" written outside of a start tag",
                name
            )));
        }
        let value = value.to_string();
        write!(
            self.writer,
            " {}=\"{}\"",
            name,
            self.escaping.apply(value.as_str())
        )?;
        Ok(self)
    }

    pub fn text(&mut self, value: &str) -> Result<&mut Self, XmlError> {
        self.close_start_tag()?;
        self.indent()?;
        let escaped = self.escaping.apply(value);
        self.writer.write_all(escaped.as_bytes())?;
        Ok(self)
    }

    pub fn end(&mut self) -> Result<&mut Self, XmlError> {
        let Some(name) = self.elements.pop() else {
            return Err(XmlError::InvalidState(
                "end called with no open element".to_string(),
            ));
        };
        if self.open {
            self.writer.write_all(b"/>")?;
            self.open = false;
            return Ok(self);
        }

        self.indent()?;
        write!(self.writer, "</{}>", name)?;
        Ok(self)
    }

    /// Flushes and hands back the writer. Fails if elements are still open.
    pub fn finish(mut self) -> Result<W, XmlError> {
        if !self.elements.is_empty() {
            return Err(XmlError::InvalidState(format!(
                "unclosed elements: {}",
                self.elements.join(" > ")
            )));
        }
        self.writer.flush()?;
        Ok(self.writer)
    }

    fn indent(&mut self) -> Result<(), XmlError> {
        self.writer.write_all(b"\n")?;
        for _ in 0..self.elements.len() {
            self.writer.write_all(b"\t")?;
        }
        Ok(())
    }

    fn close_start_tag(&mut self) -> Result<(), XmlError> {
        if self.open {
            self.writer.write_all(b">")?;
        }
        self.open = false;
        Ok(())
    }
}

#[cfg(test)]
mod xml_tests {
    use super::*;

    fn render(build: impl FnOnce(&mut XmlRenderer<Vec<u8>>) -> Result<(), XmlError>) -> String {
        let mut renderer = XmlRenderer::new(Vec::new()).expect("renderer");
        build(&mut renderer).expect("render should pass");
        let bytes = renderer.finish().expect("finish");
        String::from_utf8(bytes).expect("utf8")
    }

    fn body(output: &str) -> &str {
        output
            .strip_prefix(XML_DECLARATION)
            .expect("declaration comes first")
    }

    #[test]
    fn empty_element_self_closes() {
        let output = render(|r| r.start("a")?.end().map(|_| ()));
        assert_eq!(body(&output), "\n<a/>");
    }

    #[test]
    fn attributes_stay_on_start_tag() {
        let output = render(|r| r.start("a")?.attr("x", "1")?.attr("n", 2)?.end().map(|_| ()));
        assert_eq!(body(&output), "\n<a x=\"1\" n=\"2\"/>");
    }

    #[test]
    fn nested_elements_are_indented() {
        let output = render(|r| r.start("a")?.start("b")?.end()?.end().map(|_| ()));
        assert_eq!(body(&output), "\n<a>\n\t<b/>\n</a>");
    }

    #[test]
    fn text_closes_start_tag_and_indents() {
        let output = render(|r| {
            r.start("a")?.start("b")?.attr("k", "v")?.text("hello")?.end()?.end()?;
            Ok(())
        });
        assert_eq!(
            body(&output),
            "\n<a>\n\t<b k=\"v\">\n\t\thello\n\t</b>\n</a>"
        );
    }

    #[test]
    fn attr_after_child_fails() {
        let mut renderer = XmlRenderer::new(Vec::new()).expect("renderer");
        renderer.start("a").expect("start a");
        renderer.start("b").expect("start b");
        renderer.end().expect("end b");
        let error = renderer.attr("late", "x").expect_err("attr should fail");
        assert!(matches!(error, XmlError::InvalidState(_)));
    }

    #[test]
    fn attr_after_text_fails() {
        let mut renderer = XmlRenderer::new(Vec::new()).expect("renderer");
        renderer.start("a").expect("start");
        renderer.text("body").expect("text");
        let error = renderer.attr("late", "x").expect_err("attr should fail");
        assert!(matches!(error, XmlError::InvalidState(_)));
    }

    #[test]
    fn unbalanced_calls_fail() {
        let mut renderer = XmlRenderer::new(Vec::new()).expect("renderer");
        assert!(matches!(
            renderer.end().expect_err("end without start"),
            XmlError::InvalidState(_)
        ));

        let mut unclosed = XmlRenderer::new(Vec::new()).expect("renderer");
        unclosed.start("a").expect("start");
        assert_eq!(unclosed.depth(), 1);
        assert!(matches!(
            unclosed.finish().expect_err("unclosed"),
            XmlError::InvalidState(_)
        ));
    }

    #[test]
    fn verbatim_values_pass_through() {
        let output = render(|r| r.start("a")?.attr("m", "x < \"y\"")?.end().map(|_| ()));
        assert_eq!(body(&output), "\n<a m=\"x < \"y\"\"/>");
    }

    #[test]
    fn xml_escaping_replaces_markup() {
        let mut renderer =
            XmlRenderer::with_escaping(Vec::new(), Escaping::Xml).expect("renderer");
        renderer
            .start("a")
            .and_then(|r| r.attr("m", "1 < 2 & \"q\""))
            .and_then(|r| r.text("<b>'t'</b>"))
            .and_then(|r| r.end())
            .expect("render");
        let output = String::from_utf8(renderer.finish().expect("finish")).expect("utf8");
        assert_eq!(
            body(&output),
            "\n<a m=\"1 &lt; 2 &amp; &quot;q&quot;\">\n\t&lt;b&gt;&apos;t&apos;&lt;/b&gt;\n</a>"
        );
    }
}
