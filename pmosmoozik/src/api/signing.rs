//! Request signatures and parameter encoding
//!
//! Every call carries a `sig` parameter computed from its GET and POST
//! parameters:
//!
//! 1. take the keys of both maps whose value is not empty, `sig` excluded;
//! 2. sort them and concatenate `key + get[key] + post[key]` for each one;
//! 3. append the application secret and hash the whole string with MD5.
//!
//! Parameters are then URL-encoded with `%` escaped up front and `+` escaped
//! last, which is what the service decodes.

use md5::{Digest, Md5};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use std::collections::{BTreeMap, BTreeSet};

/// Request parameters, kept sorted by key
pub type Params = BTreeMap<String, String>;

/// Name of the signature parameter
pub const SIG_PARAM: &str = "sig";

/// Characters left untouched by the encoder. `%` has already been escaped
/// and `+` is handled in a final pass.
const PARAM_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'%')
    .remove(b'+')
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

fn md5_hex(data: &[u8]) -> String {
    let mut hasher = Md5::new();
    hasher.update(data);
    format!("{:x}", hasher.finalize())
}

/// Canonical string hashed by [`signature`], without the secret
pub fn signature_base(get: &Params, post: &Params) -> String {
    let keys: BTreeSet<&str> = get
        .iter()
        .chain(post.iter())
        .filter(|(key, value)| !value.is_empty() && key.as_str() != SIG_PARAM)
        .map(|(key, _)| key.as_str())
        .collect();

    let mut base = String::new();
    for key in keys {
        base.push_str(key);
        if let Some(value) = get.get(key) {
            base.push_str(value);
        }
        if let Some(value) = post.get(key) {
            base.push_str(value);
        }
    }
    base
}

/// Computes the `sig` parameter of a request
///
/// # Exemple
///
/// ```
/// use pmosmoozik::api::signing::{Params, signature};
///
/// let get = Params::from([("format".to_string(), "xml".to_string())]);
/// let post = Params::from([("apiKey".to_string(), "key".to_string())]);
/// let sig = signature(&get, &post, "secret");
/// assert_eq!(sig.len(), 32);
/// ```
pub fn signature(get: &Params, post: &Params, secret: &str) -> String {
    let mut hasher = Md5::new();
    hasher.update(signature_base(get, post).as_bytes());
    hasher.update(secret.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Login hash: `md5hex(username + md5hex(password))`
pub fn auth_hash(username: &str, password: &str) -> String {
    let mut hasher = Md5::new();
    hasher.update(username.as_bytes());
    hasher.update(md5_hex(password.as_bytes()).as_bytes());
    format!("{:x}", hasher.finalize())
}

fn encode_component(raw: &str) -> String {
    let escaped = raw.replace('%', "%25");
    utf8_percent_encode(&escaped, PARAM_ENCODE_SET).to_string()
}

/// Encodes a parameter map as `key=value&key=value`, in key order
pub fn encode_params(params: &Params) -> String {
    params
        .iter()
        .map(|(key, value)| format!("{}={}", encode_component(key), encode_component(value)))
        .collect::<Vec<_>>()
        .join("&")
        .replace('+', "%2B")
}
