//! Market configuration resolution engine.
//!
//! This crate turns a declarative market description into the ordered
//! deployments and calls that set a lending market up on one network:
//! - Per-network overlays with an explicit "resolve at runtime" marker
//! - Address-or-mock resolution that never mocks on production
//! - Reserve risk-parameter catalogs merged from shared defaults
//! - Rate-oracle seeding in a deterministic order
//! - Price-oracle wiring with fallback and quote-currency resolution
//!
//! Chain access goes through the [`deployer_chain::ChainSubmitter`] trait.

pub mod addresses;
mod env;
mod error;
pub mod market;
pub mod mock;
pub mod network;
pub mod oracle;
pub mod overlay;
pub mod pipeline;
pub mod rates;
pub mod reserve_init;
pub mod reserves;
pub mod symbol;

pub use addresses::{AdminRole, ResolvedAddressSet};
pub use env::expand_env;
pub use error::{ResolveError, Result};
pub use market::{MarketRegistry, PoolConfiguration};
pub use mock::{Deployment, MockDeployer, MockPolicy};
pub use network::{Network, NetworkContext};
pub use oracle::{OracleWiring, OracleWiringResolver, QuoteCurrency};
pub use overlay::{AddressOverlay, Configured, NetworkOverlay};
pub use pipeline::{DeploymentPipeline, DeploymentReport, PipelineOptions};
pub use rates::{build_seed_operations, LendingRateTable, Ray, SeedOperation};
pub use reserve_init::{ReserveConfigureInput, ReserveInitInput};
pub use reserves::{InterestRateStrategy, ReserveCatalog, ReserveStrategy};
pub use symbol::{Symbol, SymbolMap};
