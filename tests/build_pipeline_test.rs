//! Integration tests for building and reloading index artifacts on disk.

use barrel_index::analysis::preprocess;
use barrel_index::config::{IndexConfig, PreprocessConfig};
use barrel_index::error::Result;
use barrel_index::forward::ForwardIndex;
use barrel_index::inverted::InvertedIndex;
use barrel_index::lexicon::{Lexicon, NOT_FOUND};
use barrel_index::pipeline::{IndexBuilder, SourceDocument};
use barrel_index::storage::{FileStorage, Storage};
use tempfile::TempDir;

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn papers() -> Vec<SourceDocument> {
    vec![
        SourceDocument::new(
            "ug7v899j",
            "Clinical features of culture-proven Mycoplasma pneumoniae infections",
            "Objective: This retrospective chart review describes the epidemiology...",
            "Mycoplasma pneumoniae infections were diagnosed in 40 patients. \
             Infections were more common in children, and 12 patients required hospitalization.",
        ),
        SourceDocument::new(
            "02tnwd4m",
            "Nitric oxide: a pro-inflammatory mediator in lung disease?",
            "Inflammatory diseases of the respiratory tract are commonly associated...",
            "Nitric oxide is produced in the lungs and has been implicated in inflammatory lung disease.",
        ),
        SourceDocument::new(
            "ejv2xln0",
            "Surfactant protein-D and pulmonary host defense",
            "Surfactant protein-D (SP-D) participates in the innate response to inhaled microorganisms...",
            "SP-D binds to surface glycoconjugates of microorganisms and enhances host defense in the lungs.",
        ),
        SourceDocument::new("ug7v899j", "Duplicate", "", "entirely unrelated duplicate text"),
        SourceDocument::new("8qnrcgnk", "Untitled", "", "1999 2000, 3.5 -- the of"),
    ]
}

#[test]
fn test_build_and_reload_from_disk() -> Result<()> {
    init_logger();
    let dir = TempDir::new().unwrap();
    let storage = FileStorage::new(dir.path().join("indices"))?;
    let barrels = FileStorage::new(dir.path().join("indices/inverted_index_barrels"))?;

    let builder = IndexBuilder::new(IndexConfig::default())?;
    let built = builder.build(papers(), &storage, Some(&barrels as &dyn Storage))?;

    assert_eq!(built.report.documents_indexed, 3);
    assert_eq!(built.report.duplicates_skipped, 1);
    assert_eq!(built.report.empty_skipped, 1);
    assert!(!built.report.barrels.is_empty());

    let mut lexicon = Lexicon::new();
    lexicon.load(&storage, "lexicon.csv")?;
    assert_eq!(lexicon.len(), built.lexicon.len());
    assert_eq!(lexicon.next_id(), built.lexicon.next_id());
    assert_eq!(lexicon.get_frequency("lung"), 3);
    assert_eq!(lexicon.get_word_id("unrelated"), NOT_FOUND);

    let mut forward = ForwardIndex::new();
    forward.load_from_binary(&storage, "forward_index.bin")?;
    assert_eq!(forward.statistics(), built.forward.statistics());
    for (numeric_id, doc) in built.forward.documents() {
        assert_eq!(forward.numeric_id(&doc.doc_id), Some(numeric_id));
        for posting in &doc.terms {
            assert_eq!(
                forward.get_term_frequency(&doc.doc_id, posting.term_id),
                posting.frequency
            );
        }
    }

    let mut inverted = InvertedIndex::new();
    let reverse = inverted.load_from_binary(&storage, "inverted_index.bin")?;
    assert_eq!(reverse, lexicon.build_reverse()?);
    for term_id in built.inverted.term_ids() {
        assert_eq!(inverted.get_terms(term_id), built.inverted.get_terms(term_id));
    }

    Ok(())
}

#[test]
fn test_inverted_postings_agree_with_forward_index() -> Result<()> {
    init_logger();
    let dir = TempDir::new().unwrap();
    let storage = FileStorage::new(dir.path())?;

    let built = IndexBuilder::new(IndexConfig::default())?.build(papers(), &storage, None)?;

    let mut total = 0;
    for term_id in built.inverted.term_ids() {
        for posting in built.inverted.get_terms(term_id).unwrap_or_default() {
            let doc = built
                .forward
                .document_by_numeric_id(posting.doc_id)
                .expect("posting refers to an indexed document");
            assert_eq!(doc.term_frequency(term_id), posting.frequency);
            total += 1;
        }
    }
    let unique: usize = built.forward.documents().map(|(_, doc)| doc.terms.len()).sum();
    assert_eq!(total, unique);

    Ok(())
}

#[test]
fn test_document_terms_match_preprocessing() -> Result<()> {
    init_logger();
    let dir = TempDir::new().unwrap();
    let storage = FileStorage::new(dir.path())?;
    let config = IndexConfig::default();

    let built = IndexBuilder::new(config.clone())?.build(papers(), &storage, None)?;

    let source = &papers()[1];
    let tokens = preprocess(&source.raw_text, &config.preprocess);
    assert_eq!(built.forward.get_document_length(&source.doc_id) as usize, tokens.len());
    for token in &tokens {
        let term_id = built.lexicon.get_word_id(token);
        assert_ne!(term_id, NOT_FOUND);
        let expected = tokens.iter().filter(|t| *t == token).count() as u32;
        assert_eq!(built.forward.get_term_frequency(&source.doc_id, term_id), expected);
    }

    Ok(())
}

#[test]
fn test_resume_numbering_from_snapshot() -> Result<()> {
    init_logger();
    let dir = TempDir::new().unwrap();
    let first = FileStorage::new(dir.path().join("first"))?;
    let second = FileStorage::new(dir.path().join("second"))?;
    let config = IndexConfig::default()
        .with_preprocess(PreprocessConfig::default().with_stemming(false));
    let builder = IndexBuilder::new(config)?;

    let built = builder.build(papers().into_iter().take(1), &first, None)?;
    let mut lexicon = Lexicon::new();
    lexicon.load(&first, "lexicon.csv")?;
    let resumed_from = lexicon.next_id();

    let rebuilt = builder.build_from(lexicon, papers(), &second, None)?;
    for (word, entry) in built.lexicon.iter() {
        assert_eq!(rebuilt.lexicon.get_word_id(word), entry.id);
    }
    let nitric = rebuilt.lexicon.get_word_id("nitric");
    assert!(nitric >= resumed_from);

    Ok(())
}
