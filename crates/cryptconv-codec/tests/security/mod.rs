mod error_hygiene;
mod mlock_verification;
mod zeroize_on_drop;
