#![forbid(unsafe_code)]
#![deny(
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
//! Binary target for the portal bundle.
//!
//! Only the wasm32 build boots the page; native builds print where the
//! bundle comes from and exit cleanly so workspace builds stay green.

/// Shown when the binary is launched outside a browser.
#[cfg(not(target_arch = "wasm32"))]
const NATIVE_NOTICE: &str = "prokode-portal runs in the browser only. Bundle it with `trunk build` \
     (target wasm32-unknown-unknown) and serve `dist/` next to portal-config.json.";

#[cfg(target_arch = "wasm32")]
fn main() {
    prokode_portal::run_app();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> std::io::Result<()> {
    use std::io::Write as _;

    writeln!(std::io::stderr().lock(), "{NATIVE_NOTICE}")
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;

    #[test]
    fn native_notice_points_at_the_wasm_bundle() {
        assert!(NATIVE_NOTICE.contains("wasm32-unknown-unknown"));
        assert!(NATIVE_NOTICE.contains("portal-config.json"));
    }

    #[test]
    fn native_main_exits_cleanly() -> std::io::Result<()> {
        main()
    }
}
