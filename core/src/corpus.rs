//! Readers for the patent corpus and information-need files.
//!
//! Patents look like `<doc><str name="Title">..</str><str name="Abstract">..</str>
//! <str name="IPC Class">..</str>...</doc>`; queries look like
//! `<query><title>..</title><description>..</description></query>`.

use crate::builder::SourceDocument;
use crate::index::DocId;
use crate::normalizer::Normalizer;
use crate::{Error, Result};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::collections::HashMap;
use std::path::Path;

pub const TITLE_FIELD: &str = "Title";
pub const ABSTRACT_FIELD: &str = "Abstract";
pub const CLASSIFICATION_FIELD: &str = "IPC Class";

const DESCRIPTION_LEAD_IN: &str = "Relevant documents will describe";

/// Text of the direct children of a root element, keyed by `key_of`.
/// Text nested deeper than a direct child is skipped. A missing, misnamed,
/// repeated or unclosed root is a [`Error::MalformedRecord`].
fn read_children<F>(xml: &str, root: &str, key_of: F) -> Result<HashMap<String, String>>
where
    F: Fn(&BytesStart) -> Result<Option<String>>,
{
    let mut reader = Reader::from_str(xml);
    let mut depth = 0usize;
    let mut root_seen = false;
    let mut current: Option<String> = None;
    let mut text = String::new();
    let mut fields = HashMap::new();

    let check_root = |e: &BytesStart, root_seen: bool| -> Result<()> {
        if root_seen {
            return Err(Error::MalformedRecord(format!("more than one <{root}> root")));
        }
        if e.local_name().as_ref() != root.as_bytes() {
            let found = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
            return Err(Error::MalformedRecord(format!("expected <{root}>, found <{found}>")));
        }
        Ok(())
    };

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                if depth == 0 {
                    check_root(&e, root_seen)?;
                    root_seen = true;
                }
                depth += 1;
                if depth == 2 {
                    current = key_of(&e)?;
                    text.clear();
                }
            }
            Event::Empty(e) if depth == 0 => {
                check_root(&e, root_seen)?;
                root_seen = true;
            }
            Event::Text(e) if depth == 2 && current.is_some() => text.push_str(&e.unescape()?),
            Event::CData(e) if depth == 2 && current.is_some() => {
                text.push_str(&String::from_utf8_lossy(&e.into_inner()))
            }
            Event::End(_) => {
                if depth == 2 {
                    if let Some(key) = current.take() {
                        fields.insert(key, text.trim().to_string());
                    }
                }
                depth = depth.saturating_sub(1);
            }
            Event::Eof => {
                if !root_seen {
                    return Err(Error::MalformedRecord(format!("no <{root}> element")));
                }
                if depth != 0 {
                    return Err(Error::MalformedRecord(format!("<{root}> is not closed")));
                }
                break;
            }
            _ => {}
        }
    }
    Ok(fields)
}

#[derive(Debug, Clone, Default)]
pub struct PatentRecord {
    fields: HashMap<String, String>,
}

impl PatentRecord {
    pub fn parse(xml: &str) -> Result<Self> {
        let fields = read_children(xml, "doc", |e| {
            if e.local_name().as_ref() != b"str" {
                return Ok(None);
            }
            for attr in e.attributes().flatten() {
                if attr.key.local_name().as_ref() == b"name" {
                    return Ok(Some(attr.unescape_value()?.into_owned()));
                }
            }
            Ok(None)
        })?;
        Ok(Self { fields })
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::parse(&std::fs::read_to_string(path)?)
    }

    /// Missing fields read as "".
    pub fn field(&self, name: &str) -> &str {
        self.fields.get(name).map(String::as_str).unwrap_or("")
    }

    pub fn title(&self) -> &str {
        self.field(TITLE_FIELD)
    }

    pub fn abstract_text(&self) -> &str {
        self.field(ABSTRACT_FIELD)
    }

    pub fn classification(&self) -> &str {
        self.field(CLASSIFICATION_FIELD)
    }

    pub fn into_source<N: Normalizer>(self, id: DocId, normalizer: &N) -> SourceDocument {
        SourceDocument {
            title_terms: normalizer.normalize(self.title()),
            abstract_terms: normalizer.normalize(self.abstract_text()),
            classification: self.classification().to_string(),
            id,
        }
    }
}

/// A query file.
#[derive(Debug, Clone, Default)]
pub struct InformationNeed {
    pub title: String,
    /// Description with the boilerplate lead-in removed.
    pub description: String,
    pub fields: HashMap<String, String>,
}

impl InformationNeed {
    pub fn parse(xml: &str) -> Result<Self> {
        let fields = read_children(xml, "query", |e| {
            Ok(Some(String::from_utf8_lossy(e.local_name().as_ref()).into_owned()))
        })?;
        let title = fields.get("title").cloned().unwrap_or_default();
        let description = fields
            .get("description")
            .map(|d| strip_lead_in(d).to_string())
            .unwrap_or_default();
        Ok(Self { title, description, fields })
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::parse(&std::fs::read_to_string(path)?)
    }
}

fn strip_lead_in(description: &str) -> &str {
    let d = description.trim();
    d.strip_prefix(DESCRIPTION_LEAD_IN).unwrap_or(d).trim_start()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalizer::EnglishNormalizer;

    const PATENT: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<doc>
  <str name="Title">Washing machine with a drum</str>
  <str name="Abstract">A drum &amp; motor for washing clothes.</str>
  <str name="IPC Class">D06F</str>
  <str name="Empty"></str>
  <arr name="Inventors"><str name="Title">nested, ignored</str></arr>
</doc>"#;

    #[test]
    fn reads_named_fields() {
        let p = PatentRecord::parse(PATENT).unwrap();
        assert_eq!(p.title(), "Washing machine with a drum");
        assert_eq!(p.abstract_text(), "A drum & motor for washing clothes.");
        assert_eq!(p.classification(), "D06F");
        assert_eq!(p.field("Empty"), "");
        assert_eq!(p.field("Publication Date"), "");
    }

    #[test]
    fn into_source_normalizes_both_fields() {
        let doc = PatentRecord::parse(PATENT)
            .unwrap()
            .into_source(DocId::new("EP1.xml").unwrap(), &EnglishNormalizer);
        assert!(doc.title_terms.contains(&"wash".to_string()));
        assert!(doc.abstract_terms.contains(&"drum".to_string()));
        assert_eq!(doc.classification, "D06F");
    }

    #[test]
    fn wrong_root_is_rejected() {
        assert!(PatentRecord::parse("<patent><str name=\"Title\">x</str></patent>").is_err());
        assert!(PatentRecord::parse("<doc><str name=\"Title\">x</doc>").is_err());
        assert!(PatentRecord::parse("<patent/>").is_err());
        assert!(PatentRecord::parse("").is_err());
        assert!(PatentRecord::parse("<doc></doc><doc></doc>").is_err());
    }

    #[test]
    fn truncated_record_is_rejected() {
        let err = PatentRecord::parse("<doc><str name=\"Title\">x</str>");
        assert!(matches!(err, Err(Error::MalformedRecord(_))));
    }

    #[test]
    fn self_closing_root_reads_as_empty_record() {
        let p = PatentRecord::parse("<?xml version=\"1.0\"?><doc/>").unwrap();
        assert_eq!(p.title(), "");
        assert_eq!(p.classification(), "");
    }

    #[test]
    fn nested_markup_inside_a_child_is_skipped() {
        let q = InformationNeed::parse("<query><title>Washer <b>drum</b></title></query>").unwrap();
        assert_eq!(q.title, "Washer");
    }

    #[test]
    fn query_description_drops_lead_in() {
        let q = InformationNeed::parse(
            "<query><num>q1</num><title>Washer</title>\
             <description>Relevant documents will describe a drum washer.</description></query>",
        )
        .unwrap();
        assert_eq!(q.title, "Washer");
        assert_eq!(q.description, "a drum washer.");
        assert_eq!(q.fields["num"], "q1");
    }
}
