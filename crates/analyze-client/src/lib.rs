//! Client for the AI analysis service used to draft support replies.
//!
//! Exposes the [`Analyzer`] trait as the seam the rest of the system
//! programs against, an HTTP implementation ([`AnalyzeClient`]), and the
//! response pipeline: lenient body parsing ([`salvage`]) followed by
//! schema-tolerant field extraction ([`normalize`]).
//!
//! The pipeline never fails on response content. Transport and HTTP
//! errors surface as an [`AnalysisOutcome`] with `success == false`;
//! everything else degrades to a best-effort, possibly empty result.

pub mod client;
pub mod config;
pub mod error;
pub mod normalize;
pub mod salvage;

pub use client::{AnalysisOutcome, AnalysisRequest, AnalyzeClient, Analyzer};
pub use config::AnalyzeConfig;
pub use error::AnalyzeError;
pub use normalize::{normalize, Normalized};
pub use salvage::parse_lenient;
