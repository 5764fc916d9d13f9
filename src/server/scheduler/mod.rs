pub mod proposal_expiry;
