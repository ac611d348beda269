// ABOUTME: Provisioners for the three deployment resources.
// ABOUTME: Origin bucket, CDN distribution and DNS alias record.

mod edge;
mod name;
mod origin;

pub use edge::{
    CACHING_OPTIMIZED_POLICY_ID, EdgeHandle, EdgeProvisioner, MINIMUM_VIEWER_PROTOCOL, ORIGIN_ID,
    TeardownPolicy, caller_reference, distribution_config,
};
pub use name::{CLOUDFRONT_HOSTED_ZONE_ID, NameProvisioner, alias_record};
pub use origin::{DEFAULT_INDEX_DOCUMENT, OriginFailure, OriginHandle, OriginProvisioner};
