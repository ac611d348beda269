// ABOUTME: Type-safe identifiers and validated domain types.
// ABOUTME: Uses phantom types to prevent ID confusion at compile time.

mod domain_name;
mod id;
mod site_name;

pub use domain_name::{DomainName, DomainNameError};
pub use id::{DistributionId, ZoneId};
pub use site_name::{SiteName, SiteNameError};
