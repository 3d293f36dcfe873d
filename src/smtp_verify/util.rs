use rand::{Rng, distributions::Alphanumeric};

const CATCH_ALL_PREFIX: &str = "verify-";
const CATCH_ALL_SUFFIX_LEN: usize = 24;

/// Synthetic local part that almost certainly names no mailbox.
pub(crate) fn random_local_part() -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(CATCH_ALL_SUFFIX_LEN)
        .map(|b| char::from(b).to_ascii_lowercase())
        .collect();
    format!("{CATCH_ALL_PREFIX}{suffix}")
}
