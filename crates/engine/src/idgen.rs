//! Identifier generator - account numbers and routing codes

use rand::Rng;
use unitybank_core::BankError;
use unitybank_store::AccountRepository;

/// Prefix of every externally visible account number.
pub const ACCOUNT_PREFIX: &str = "BNK";

/// Prefix of every routing code.
pub const ROUTING_PREFIX: &str = "IFSC";

/// Collision re-roll budget before handing back an unchecked candidate.
const MAX_ATTEMPTS: u32 = 8;

/// Produce a collision-checked account number candidate (`BNK` + 5 digits).
///
/// Best effort: after `MAX_ATTEMPTS` collisions the last candidate is
/// returned unchecked rather than looping forever. The probe only reduces
/// collision probability; the store's primary key on insert is the hard
/// uniqueness guarantee, so a concurrent duplicate still fails the opening
/// operation with `DuplicateIdentifier`.
pub async fn account_number<R>(repo: &R) -> Result<String, BankError>
where
    R: AccountRepository + ?Sized,
{
    let mut candidate = random_account_no();
    for _ in 0..MAX_ATTEMPTS {
        if !repo.account_no_exists(&candidate).await? {
            return Ok(candidate);
        }
        candidate = random_account_no();
    }
    Ok(candidate)
}

/// Produce a routing code (`IFSC` + 4 digits). Uniqueness is not enforced;
/// branches share codes in practice.
pub fn routing_code() -> String {
    format!("{}{}", ROUTING_PREFIX, rand::thread_rng().gen_range(1000..=9999))
}

fn random_account_no() -> String {
    format!(
        "{}{}",
        ACCOUNT_PREFIX,
        rand::thread_rng().gen_range(10000..=99999)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use unitybank_store::MemoryLedger;

    fn assert_format(value: &str, prefix: &str, digits: usize) {
        let suffix = value.strip_prefix(prefix).expect("prefix");
        assert_eq!(suffix.len(), digits);
        assert!(suffix.chars().all(|c| c.is_ascii_digit()));
    }

    #[tokio::test]
    async fn account_number_has_expected_shape() {
        let ledger = MemoryLedger::new();
        for _ in 0..20 {
            let no = account_number(&ledger).await.unwrap();
            assert_format(&no, ACCOUNT_PREFIX, 5);
        }
    }

    #[test]
    fn routing_code_has_expected_shape() {
        for _ in 0..20 {
            assert_format(&routing_code(), ROUTING_PREFIX, 4);
        }
    }
}
