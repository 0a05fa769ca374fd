use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use std::io::Cursor;

use crate::core::SzamlaError;

fn xml_io(e: std::io::Error) -> SzamlaError {
    SzamlaError::Xml(format!("write error: {e}"))
}

pub struct XmlWriter {
    writer: Writer<Cursor<Vec<u8>>>,
}

impl XmlWriter {
    pub fn new() -> Result<Self, SzamlaError> {
        let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);
        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
            .map_err(xml_io)?;
        Ok(Self { writer })
    }

    pub fn into_string(self) -> Result<String, SzamlaError> {
        let buf = self.writer.into_inner().into_inner();
        String::from_utf8(buf).map_err(|e| SzamlaError::Xml(format!("UTF-8 error: {e}")))
    }

    pub fn start_element(&mut self, name: &str) -> Result<&mut Self, SzamlaError> {
        self.start_element_with_attrs(name, &[])
    }

    pub fn start_element_with_attrs(
        &mut self,
        name: &str,
        attrs: &[(&str, &str)],
    ) -> Result<&mut Self, SzamlaError> {
        check_name(name)?;
        let mut elem = BytesStart::new(name);
        for (k, v) in attrs {
            elem.push_attribute((*k, *v));
        }
        self.writer
            .write_event(Event::Start(elem))
            .map_err(xml_io)?;
        Ok(self)
    }

    pub fn end_element(&mut self, name: &str) -> Result<&mut Self, SzamlaError> {
        self.writer
            .write_event(Event::End(BytesEnd::new(name)))
            .map_err(xml_io)?;
        Ok(self)
    }

    pub fn empty_element(&mut self, name: &str) -> Result<&mut Self, SzamlaError> {
        check_name(name)?;
        self.writer
            .write_event(Event::Empty(BytesStart::new(name)))
            .map_err(xml_io)?;
        Ok(self)
    }

    pub fn text_element(&mut self, name: &str, text: &str) -> Result<&mut Self, SzamlaError> {
        self.start_element(name)?;
        self.writer
            .write_event(Event::Text(BytesText::new(text)))
            .map_err(xml_io)?;
        self.end_element(name)
    }
}

fn check_name(name: &str) -> Result<(), SzamlaError> {
    if is_valid_element_name(name) {
        Ok(())
    } else {
        Err(SzamlaError::Xml(format!("'{name}' is not a valid element name")))
    }
}

/// Conservative XML name check: a letter or `_` followed by letters, digits,
/// `-`, `_`, `.` or `:`.
pub fn is_valid_element_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || matches!(c, '-' | '_' | '.' | ':'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn element_names() {
        for good in ["xmlszamla", "fejlec", "keltDatum", "_x", "tetel-1", "xsi:schemaLocation"] {
            assert!(is_valid_element_name(good), "{good}");
        }
        for bad in ["", "1st", "bad key", "a<b", "-x"] {
            assert!(!is_valid_element_name(bad), "{bad}");
        }
    }

    #[test]
    fn text_is_escaped() {
        let mut w = XmlWriter::new().unwrap();
        w.text_element("megjegyzes", "Kis & Nagy <Kft>").unwrap();
        let xml = w.into_string().unwrap();
        assert!(xml.contains("<megjegyzes>Kis &amp; Nagy &lt;Kft&gt;</megjegyzes>"));
    }

    #[test]
    fn rejects_invalid_names() {
        let mut w = XmlWriter::new().unwrap();
        assert!(matches!(w.start_element("bad key"), Err(SzamlaError::Xml(_))));
    }
}
