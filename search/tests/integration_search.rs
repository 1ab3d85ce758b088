use patsearch_core::builder::{IndexBuilder, SortedDocuments};
use patsearch_core::corpus::PatentRecord;
use patsearch_core::persist::{save_dictionary, write_postings_file};
use patsearch_core::{DocId, Dictionary, EnglishNormalizer, SearchConfig};
use patsearch_search::{run_query_file, IndexFiles};
use std::fs;
use tempfile::tempdir;

const PATENTS: &[(&str, &str, &str, &str)] = &[
    ("EP0001.xml", "Washing machine drum", "A rotating drum for a washing machine.", "D06F"),
    ("EP0002.xml", "Laundry dryer", "A heat pump dryer for laundry.", "D06F"),
    ("EP0003.xml", "Disc brake", "A brake caliper with pads.", "B60T"),
    ("EP0004.xml", "Network router", "Packet routing in a network.", "H04L"),
];

fn build_tiny_index(dir: &std::path::Path) -> IndexFiles {
    let normalizer = EnglishNormalizer;
    let docs = PATENTS
        .iter()
        .map(|(id, title, abs, ipc)| {
            let xml = format!(
                "<doc><str name=\"Title\">{title}</str><str name=\"Abstract\">{abs}</str>\
                 <str name=\"IPC Class\">{ipc}</str></doc>"
            );
            PatentRecord::parse(&xml).unwrap().into_source(DocId::new(*id).unwrap(), &normalizer)
        })
        .collect();
    let built = IndexBuilder::new().build(SortedDocuments::new(docs).unwrap());

    let index = IndexFiles { dictionary: dir.join("dictionary.bin"), postings: dir.join("postings.txt") };
    let terms = write_postings_file(&index.postings, &built.postings, built.num_docs()).unwrap();
    save_dictionary(&index.dictionary, &Dictionary { docs: built.docs, terms }).unwrap();
    index
}

#[test]
fn query_file_yields_expanded_ranking_without_suffix() {
    let dir = tempdir().unwrap();
    let index = build_tiny_index(dir.path());
    let query = dir.path().join("q1.xml");
    fs::write(
        &query,
        "<query><num>q1</num><title>washing drum</title>\
         <description>Relevant documents will describe a washing machine drum.</description></query>",
    )
    .unwrap();
    let output = dir.path().join("out.txt");

    let config = SearchConfig { expansion_depth: 1, ..SearchConfig::default() };
    let hits = run_query_file(&index, &query, &output, &config).unwrap();

    // The top hit is EP0001 (D06F); expansion pulls in the other D06F patent only.
    assert_eq!(hits, 2);
    assert_eq!(fs::read_to_string(&output).unwrap(), "EP0001 EP0002\n");
}

#[test]
fn default_depth_covers_small_corpus() {
    let dir = tempdir().unwrap();
    let index = build_tiny_index(dir.path());
    let query = dir.path().join("q2.xml");
    fs::write(&query, "<query><title>brake</title><description>caliper</description></query>").unwrap();
    let output = dir.path().join("out.txt");

    run_query_file(&index, &query, &output, &SearchConfig::default()).unwrap();
    let line = fs::read_to_string(&output).unwrap();
    let ids: Vec<&str> = line.split_whitespace().collect();
    assert_eq!(ids, vec!["EP0003", "EP0001", "EP0002", "EP0004"]);
}

#[test]
fn missing_query_file_is_an_error() {
    let dir = tempdir().unwrap();
    let index = build_tiny_index(dir.path());
    let res = run_query_file(&index, &dir.path().join("nope.xml"), &dir.path().join("o.txt"), &SearchConfig::default());
    assert!(res.is_err());
}
