//! `tariffscope-recon` — Multi-source tariff rate resolution engine.
//!
//! Pure engine crate: adapters hand it tariff entries, it returns one
//! aggregated rate per country with provenance and a confidence tier.
//! No CLI, file or network dependencies; those adapters live in
//! `tariffscope-io` and `tariffscope-fetch`.

pub mod aggregate;
pub mod cache;
pub mod error;
pub mod model;
pub mod normalize;
pub mod reprieve;
pub mod resolver;
pub mod source;
pub mod tables;

pub use error::{RateParseError, SourceError};
pub use model::{Confidence, CountryTariffView, ResolvedCountryTariff, SourceTier, TariffEntry, TariffStatus};
pub use normalize::{normalize, try_normalize, RawRate, RateReading};
pub use reprieve::{Reprieve, ReprieveOverlay};
pub use resolver::{resolve_country_tariff, Resolver, SourceSummary};
pub use source::TariffSource;
