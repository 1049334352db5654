//! # Depchart
//!
//! Depchart is an exhaustive chart parser for projective dependency trees.
//! It computes exact inside (and optionally outside) Viterbi scores for every
//! head word, head tag and span edge, and recovers the best tree by backtrace.
//!
//! ## Examples
//!
//! ```
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use std::sync::Arc;
//!
//! use depchart::{GrammarConfig, Parser, Sentence, TableGrammar, TableLexicon, Vocabulary};
//!
//! let lexicon_csv = "the,DT,0\ndog,NN,0\nbarks,VBZ,0";
//! let grammar_csv = "\
//! arg,.$$.,VBZ,L,*,-0.1
//! arg,VBZ,NN,L,*,-0.5
//! arg,NN,DT,L,*,-0.2";
//!
//! let mut vocab = Vocabulary::new();
//! let lexicon = TableLexicon::from_reader(lexicon_csv.as_bytes(), &mut vocab)?;
//! let vocab = Arc::new(vocab);
//! let grammar = TableGrammar::from_reader(
//!     grammar_csv.as_bytes(),
//!     vocab.clone(),
//!     GrammarConfig::default(),
//! )?;
//!
//! let parser = Parser::new(vocab, grammar, lexicon)?;
//! let mut worker = parser.new_worker();
//!
//! assert!(worker.parse(&Sentence::from_words(["the", "dog", "barks"]))?);
//! assert!((worker.best_score() + 0.8).abs() < 1e-5);
//!
//! let tree = worker.best_parse()?.unwrap();
//! assert_eq!(
//!     tree.to_string(),
//!     "(.$./.$$. (barks/VBZ (dog/NN the/DT dog/NN) barks/VBZ) .$./.$$.)"
//! );
//! assert_eq!(tree.arcs(), vec![(0, 1), (1, 2), (2, 3)]);
//! # Ok(())
//! # }
//! ```
#![deny(missing_docs)]

pub mod common;
pub mod errors;
pub mod grammar;
pub mod lexicon;
pub mod num;
pub mod parser;
pub mod scorer;
pub mod sentence;
pub mod tree;
mod utils;
pub mod vocab;


pub use grammar::{DependencyGrammar, GrammarConfig, TableGrammar};
pub use lexicon::{Lexicon, TableLexicon};
pub use parser::Parser;
pub use parser::cancel::CancelToken;
pub use parser::worker::Worker;
pub use scorer::Scorer;
pub use sentence::{Sentence, TaggedWord};
pub use tree::DepTree;
pub use vocab::Vocabulary;

/// Version number of this library.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
