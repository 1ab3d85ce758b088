use crate::index::{DocId, Dictionary, Field, FieldPostings, PerField, Posting, PostingsEntry};
use crate::{Error, Result};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Seek, SeekFrom, Write};
use std::path::Path;

/// idf = log10(N / df). df >= 1 for every stored term.
pub fn idf(num_docs: usize, df: usize) -> f64 {
    (num_docs as f64 / df as f64).log10()
}

/// One postings record: `id,weight id,weight ...` with 9 fractional digits.
fn encode_record(postings: &[Posting]) -> String {
    let mut record = String::new();
    for (i, p) in postings.iter().enumerate() {
        if i > 0 {
            record.push(' ');
        }
        record.push_str(p.doc_id.as_str());
        record.push(DocId::FIELD_SEPARATOR);
        record.push_str(&format!("{:.9}", p.weight));
    }
    record
}

/// Appends every field's postings to `out`, one newline-terminated record per
/// term, and returns where each record landed.
pub fn write_postings<W: Write>(
    out: W,
    postings: &PerField<FieldPostings>,
    num_docs: usize,
) -> Result<PerField<HashMap<String, PostingsEntry>>> {
    let mut out = BufWriter::new(out);
    let mut offset: u64 = 0;
    let mut directory: PerField<HashMap<String, PostingsEntry>> = PerField::default();

    for field in Field::ALL {
        let entries = directory.get_mut(field);
        for (term, plist) in postings.get(field) {
            let record = encode_record(plist);
            out.write_all(record.as_bytes())?;
            out.write_all(b"\n")?;
            let length = record.len() as u64;
            entries.insert(term.clone(), PostingsEntry { offset, length, idf: idf(num_docs, plist.len()) });
            offset += length + 1;
        }
        tracing::debug!(?field, terms = entries.len(), "wrote field postings");
    }
    out.flush()?;
    Ok(directory)
}

pub fn write_postings_file<P: AsRef<Path>>(
    path: P,
    postings: &PerField<FieldPostings>,
    num_docs: usize,
) -> Result<PerField<HashMap<String, PostingsEntry>>> {
    write_postings(File::create(path)?, postings, num_docs)
}

/// Random access over a postings file; reads one record per lookup.
pub struct PostingsReader<R> {
    inner: R,
    /// File length, measured on first read.
    len: Option<u64>,
}

impl PostingsReader<BufReader<File>> {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self::new(BufReader::new(File::open(path)?)))
    }
}

impl<R: Read + Seek> PostingsReader<R> {
    pub fn new(inner: R) -> Self {
        Self { inner, len: None }
    }

    fn file_len(&mut self) -> Result<u64> {
        match self.len {
            Some(len) => Ok(len),
            None => {
                let len = self.inner.seek(SeekFrom::End(0))?;
                self.len = Some(len);
                Ok(len)
            }
        }
    }

    pub fn read_entry(&mut self, entry: &PostingsEntry) -> Result<Vec<Posting>> {
        let len = self.file_len()?;
        match entry.offset.checked_add(entry.length) {
            Some(end) if end <= len => {}
            _ => {
                return Err(Error::MalformedPostings {
                    offset: entry.offset,
                    reason: format!("record of {} bytes runs past end of {len}-byte file", entry.length),
                })
            }
        }
        self.inner.seek(SeekFrom::Start(entry.offset))?;
        let mut buf = vec![0u8; entry.length as usize];
        self.inner.read_exact(&mut buf)?;
        let record = String::from_utf8(buf).map_err(|e| Error::MalformedPostings {
            offset: entry.offset,
            reason: e.to_string(),
        })?;
        record
            .split_whitespace()
            .map(|token| decode_posting(token, entry.offset))
            .collect()
    }

    /// Postings of `term` in `field`; empty when the term was never indexed.
    pub fn read(&mut self, dictionary: &Dictionary, field: Field, term: &str) -> Result<Vec<Posting>> {
        match dictionary.lookup(field, term) {
            Some(entry) => self.read_entry(entry),
            None => Ok(Vec::new()),
        }
    }
}

fn decode_posting(token: &str, offset: u64) -> Result<Posting> {
    let malformed = |reason: String| Error::MalformedPostings { offset, reason };
    let (id, weight) = token
        .split_once(DocId::FIELD_SEPARATOR)
        .ok_or_else(|| malformed(format!("missing separator in {token:?}")))?;
    let weight: f64 = weight
        .parse()
        .map_err(|_| malformed(format!("bad weight in {token:?}")))?;
    Ok(Posting { doc_id: DocId::new(id)?, weight })
}

/// `.json` dictionaries are JSON; anything else is bincode.
fn is_json(path: &Path) -> bool {
    path.extension().and_then(|s| s.to_str()) == Some("json")
}

pub fn save_dictionary<P: AsRef<Path>>(path: P, dictionary: &Dictionary) -> Result<()> {
    let path = path.as_ref();
    let mut f = BufWriter::new(File::create(path)?);
    if is_json(path) {
        serde_json::to_writer(&mut f, dictionary)?;
    } else {
        bincode::serialize_into(&mut f, dictionary)?;
    }
    f.flush()?;
    Ok(())
}

pub fn load_dictionary<P: AsRef<Path>>(path: P) -> Result<Dictionary> {
    let path = path.as_ref();
    let mut f = File::open(path)?;
    let mut buf = Vec::new();
    f.read_to_end(&mut buf)?;
    let dictionary = if is_json(path) {
        serde_json::from_slice(&buf)?
    } else {
        bincode::deserialize(&buf)?
    };
    Ok(dictionary)
}
