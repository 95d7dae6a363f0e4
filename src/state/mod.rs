//! State module for tracking where a crawl run is
//!
//! `CrawlPhase` names the orchestrator's states and the transitions allowed
//! between them.

mod crawl_phase;

pub use crawl_phase::CrawlPhase;
