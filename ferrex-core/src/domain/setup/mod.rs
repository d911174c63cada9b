pub mod claim;

pub use claim::{
    ConfirmedClaim, ConsumedClaim, SetupClaimError, SetupClaimService,
    StartedClaim, ValidatedClaimToken,
};
