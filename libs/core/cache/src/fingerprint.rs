// [libs/core/cache/src/fingerprint.rs]
//! Deterministic cache key (§4.3): hex SHA-256 of
//! `model || "|" || prompt || "|" || k1:v1,k2:v2,...` with parameter keys
//! sorted lexicographically.

use sha2::{Digest, Sha256};

pub fn fingerprint(model: &str, prompt: &str, params: &[(&str, &str)]) -> String {
    let mut sorted_params: Vec<&(&str, &str)> = params.iter().collect();
    sorted_params.sort_by_key(|(k, _)| *k);

    let params_str = sorted_params
        .iter()
        .map(|(k, v)| format!("{k}:{v}"))
        .collect::<Vec<_>>()
        .join(",");

    let canonical = format!("{model}|{prompt}|{params_str}");
    hex::encode(Sha256::digest(canonical.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parameter_order_does_not_affect_the_fingerprint() {
        let a = fingerprint("llama", "hello", &[("temperature", "0"), ("top_p", "1")]);
        let b = fingerprint("llama", "hello", &[("top_p", "1"), ("temperature", "0")]);
        assert_eq!(a, b);
    }

    #[test]
    fn different_prompts_fingerprint_differently() {
        let a = fingerprint("llama", "hello", &[]);
        let b = fingerprint("llama", "goodbye", &[]);
        assert_ne!(a, b);
    }
}
