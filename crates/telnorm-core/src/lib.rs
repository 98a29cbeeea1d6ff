//! telnorm-core — device telemetry normalization engine.
//!
//! Turns one retrieved device document (a NETCONF XML reply or an SNMP walk)
//! plus a declarative device profile into discovered instances and numeric
//! metrics, encoded for a monitoring platform.
//!
//! Provides:
//! - `adapter` — document sources, NETCONF reply and `snmpwalk` parsers
//! - `config` — profile loading (YAML/JSON) into typed specs
//! - `resolve` — path expressions and the three-tier XML / OID resolution
//! - `discovery` — instances with primary → fallback → type-derived ids
//! - `transform` — string maps, timestamps, multipliers
//! - `extract` — per-instance and chassis metrics
//! - `collector` — one full run with counts and timing
//! - `output` — discovery line, flat line, JSON and table encoders
//! - `trace` — injected structured trace events
//! - `fixtures` — captured documents and profiles for tests
//!
//! ```
//! use telnorm_core::adapter::load_document;
//! use telnorm_core::collector::Collector;
//! use telnorm_core::config::Profile;
//! use telnorm_core::fixtures;
//! use telnorm_core::output::{ChassisEmission, collection_lines};
//!
//! let profile: Profile = fixtures::CORIANT_PROFILE.parse().unwrap();
//! let doc = load_document(fixtures::CORIANT_REPLY, profile.protocol()).unwrap();
//! let run = Collector::default().run_raw(&doc, &profile).unwrap();
//! let text = collection_lines(&run.metrics, &ChassisEmission::default());
//! assert!(text.contains("Line-East-OTS.admin_status=1.0\n"));
//! ```

pub mod adapter;
pub mod collector;
pub mod config;
pub mod discovery;
pub mod error;
pub mod extract;
pub mod fixtures;
pub mod models;
pub mod output;
pub mod resolve;
pub mod sanitize;
pub mod trace;
pub mod transform;

pub use collector::{CollectionRun, Collector, CollectorTiming};
pub use config::Profile;
pub use error::{ConfigError, DocumentError, PathError, SourceError};
pub use models::{CollectionStats, DiscoveredInstance, MetricValue};
pub use trace::{NoopTrace, RecordingTrace, Trace, TracingTrace};
