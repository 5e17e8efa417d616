//! Compile-once regular expressions shared by the detection pipeline.

use std::sync::LazyLock;

use regex::Regex;

/// Compiles a pattern literal.
///
/// Every caller passes a constant that is exercised by the unit tests,
/// so a failure here is a programming error caught before release.
#[allow(clippy::expect_used)]
fn compile(pattern: &'static str) -> Regex {
    Regex::new(pattern).expect("static pattern literal must compile")
}

pub(crate) static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| compile(r"\s+"));

pub(crate) static BOILERPLATE: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?i)cookie|privacy|terms|policy"));

pub(crate) static ISO_DATE: LazyLock<Regex> = LazyLock::new(|| compile(r"\d{4}-\d{2}-\d{2}"));

pub(crate) static CLOCK_TIME: LazyLock<Regex> = LazyLock::new(|| compile(r"\d{2}:\d{2}:\d{2}"));

/// A dollar amount inside running text, thousands separators included.
pub(crate) static CURRENCY_AMOUNT: LazyLock<Regex> =
    LazyLock::new(|| compile(r"\$\d+(?:,\d{3})*(?:\.\d+)?"));

/// A token that is nothing but a dollar amount.
pub(crate) static BARE_CURRENCY_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| compile(r"^\$\d+(?:,\d{3})*(?:\.\d*)?$"));

pub(crate) static TITLE: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?i)<title[^>]*>([^<]+)</title>"));

pub(crate) static SCRIPT_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?is)<script[^>]*>.*?</script>"));

pub(crate) static STYLE_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?is)<style[^>]*>.*?</style>"));

pub(crate) static ANY_TAG: LazyLock<Regex> = LazyLock::new(|| compile(r"<[^>]+>"));

pub(crate) static PRODUCT_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    compile(r#"(?is)<div[^>]*class=["']product["'][^>]*>.*?</div>\s*</div>"#)
});

pub(crate) static PRODUCT_NAME: LazyLock<Regex> = LazyLock::new(|| {
    compile(r#"(?i)<h3[^>]*class=["']product-name["'][^>]*>([^<]+)</h3>"#)
});

pub(crate) static PRODUCT_PRICE_WITH_ID: LazyLock<Regex> = LazyLock::new(|| {
    compile(
        r#"(?i)<span[^>]*class=["']product-price[^"']*["'][^>]*data-product-id=["'](\d+)["'][^>]*>([^<]+)</span>"#,
    )
});

pub(crate) static PRODUCT_PRICE: LazyLock<Regex> = LazyLock::new(|| {
    compile(r#"(?i)<span[^>]*class=["']product-price[^"']*["'][^>]*>([^<]+)</span>"#)
});

pub(crate) static PRODUCT_DESCRIPTION: LazyLock<Regex> = LazyLock::new(|| {
    compile(r#"(?i)<p[^>]*class=["']product-description["'][^>]*>([^<]+)</p>"#)
});

pub(crate) static PRODUCT_ID_ATTR: LazyLock<Regex> =
    LazyLock::new(|| compile(r#"(?i)data-product-id=["'](\d+)["']"#));

/// Leading numeric prefix of a cleaned price string.
pub(crate) static PRICE_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| compile(r"^[+-]?(?:\d+\.?\d*|\.\d+)"));

/// Characters that are not word characters or whitespace.
pub(crate) static PUNCTUATION: LazyLock<Regex> = LazyLock::new(|| compile(r"[^\w\s]"));
