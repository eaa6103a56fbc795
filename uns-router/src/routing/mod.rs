//! Routing layer: path algebra, namespace resolution, cached pattern matching and the
//! consumer directory used for fan-out.
//!
//! ```
//! use uns_router::{NamespaceConfig, UnsRouter};
//!
//! let router = UnsRouter::new("routing-doc");
//! router.register_namespace(NamespaceConfig::new("Plant1"));
//! router.register_namespace(NamespaceConfig::new("Plant1/ERP"));
//!
//! // Candidates are scanned in descending path order; the first strict ancestor wins.
//! let resolved = router.resolve_namespace("Plant1/ERP/Status").unwrap();
//! assert_eq!(resolved.path, "Plant1/ERP");
//!
//! assert!(router.pattern_matches("Plant1/+", "Plant1/ERP"));
//! assert!(!router.pattern_matches("Plant1/+", "Plant1/ERP/Status"));
//! ```

pub(crate) mod consumer_directory;
pub(crate) mod namespace_registry;
pub mod path;
pub(crate) mod pattern_cache;
