//! Desktop browser identification

use rand::seq::SliceRandom;

/// Desktop platforms a page fetch may claim to run on
const DESKTOP_PLATFORMS: &[&str] = &[
    "Windows NT 10.0; Win64; x64",
    "Macintosh; Intel Mac OS X 10_15_7",
    "X11; Linux x86_64",
];

const CHROME_VERSIONS: &[&str] = &["122.0.0.0", "123.0.0.0", "124.0.0.0", "125.0.0.0"];

const FIREFOX_VERSIONS: &[&str] = &["123.0", "124.0", "125.0"];

/// Pick a plausible desktop browser User-Agent
pub fn desktop_user_agent() -> String {
    let mut rng = rand::thread_rng();
    let platform = DESKTOP_PLATFORMS
        .choose(&mut rng)
        .copied()
        .unwrap_or("Windows NT 10.0; Win64; x64");

    if rand::random::<bool>() {
        let version = CHROME_VERSIONS.choose(&mut rng).copied().unwrap_or("124.0.0.0");
        format!(
            "Mozilla/5.0 ({}) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/{} Safari/537.36",
            platform, version
        )
    } else {
        let version = FIREFOX_VERSIONS.choose(&mut rng).copied().unwrap_or("125.0");
        format!(
            "Mozilla/5.0 ({}; rv:{}) Gecko/20100101 Firefox/{}",
            platform, version, version
        )
    }
}

/// Accept header for HTML pages
pub fn accept_html() -> &'static str {
    "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"
}
