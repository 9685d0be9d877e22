//! Remote banner image policy.
//!
//! Only banners served over https from the two upstream CDNs may be loaded by
//! an image layer. Everything else is linked, not embedded.

use url::Url;

pub const ALLOWED_IMAGE_HOSTS: &[&str] = &["stcdn.business-online.ru", "img-sport.business-gazeta.ru"];

/// True if `banner` is an absolute https URL on an allowed image host.
pub fn is_allowed_banner(banner: &str) -> bool {
    match Url::parse(banner) {
        Ok(url) => {
            url.scheme() == "https"
                && url
                    .host_str()
                    .is_some_and(|host| ALLOWED_IMAGE_HOSTS.contains(&host))
        }
        Err(_) => false,
    }
}
