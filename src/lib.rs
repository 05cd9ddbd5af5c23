//! # docsift
//!
//! Batch analysis of PDF documents: every document gets an AI-authorship
//! likelihood score, and every pair of documents gets an n-gram overlap
//! percentage.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐   ┌─────────────┐   ┌──────────────────────┐
//! │   Intake    │──▶│  Extract    │──▶│   Batch pipeline     │
//! │ PDF / ZIP   │   │ pdf-extract │   │ Score  +  Similarity │
//! └─────────────┘   └─────────────┘   └──────────┬───────────┘
//!                                                │
//!                                                ▼
//!                                         ┌────────────┐
//!                                         │ BatchReport│──▶ text / JSON
//!                                         └────────────┘
//! ```
//!
//! Scoring runs `normalize` → [`classifier::Classifier`]; similarity runs
//! `shingles` → Jaccard over the raw text. The two never share
//! intermediate state.
//!
//! ## Quick Start
//!
//! ```bash
//! docsift analyze essays/                 # every PDF under essays/
//! docsift analyze a.pdf bundle.zip --format json
//! docsift similarity a.pdf b.pdf --n 4
//! docsift normalize notes.txt
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`models`] | Documents and the batch report |
//! | [`tokenize`] | Treebank-style word tokenizer |
//! | [`normalize`] | Classifier-facing text normalization |
//! | [`lemmatize`] | Rule-based English noun lemmatizer |
//! | [`shingle`] | Word n-gram shingles |
//! | [`similarity`] | Jaccard similarity matrix |
//! | [`classifier`] | Binary classifier abstraction and providers |
//! | [`score`] | AI-likelihood scorer |
//! | [`extract`] | PDF text extraction |
//! | [`intake`] | File, directory, and zip collection |
//! | [`pipeline`] | Batch orchestration |
//! | [`progress`] | Progress reporting on stderr |
//! | [`render`] | Text and JSON report output |

pub mod classifier;
pub mod config;
pub mod extract;
pub mod intake;
pub mod lemmatize;
pub mod models;
pub mod normalize;
pub mod pipeline;
pub mod progress;
pub mod render;
pub mod score;
pub mod shingle;
pub mod similarity;
pub mod tokenize;
