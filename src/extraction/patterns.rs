use lazy_static::lazy_static;
use regex::Regex;

// Shared regex vocabularies for field extraction. Label phrases live in the
// swappable vocabulary (models::vocab); what belongs here is the fixed token
// grammar of the domain: dosages, monetary tokens, date shapes, name pairs.
lazy_static! {
    /// Dosage span: number glued to or spaced from a recognized unit.
    /// No leading boundary so codes like "PCM500mg" still yield the dosage.
    pub static ref DOSAGE: Regex =
        Regex::new(r"(?i)(\d{1,4}(?:\.\d+)?)\s*(mg|mcg|ml|g|iu)\b").unwrap();

    /// Explicit quantity markers like "Qty: 2" or "qty - 30".
    pub static ref QUANTITY_MARKER: Regex =
        Regex::new(r"(?i)\bqty\.?\s*[:\-]?\s*(\d{1,4})\b").unwrap();

    /// Leading numeric product/packaging codes on medication lines.
    pub static ref LEADING_PRODUCT_CODE: Regex = Regex::new(r"^\s*\d{3,}\s+").unwrap();

    /// Monetary tokens: ₦-prefixed, NGN-prefixed, or NGN-suffixed amounts
    /// with optional thousands separators and decimals.
    pub static ref CURRENCY_TOKEN: Regex = Regex::new(
        r"(?i)(₦\s?[\d,]+(?:\.\d+)?|NGN\s?[\d,]+(?:\.\d+)?|[\d,]+(?:\.\d+)?\s?NGN\b)",
    )
    .unwrap();

    /// Bare numeric amount, accepted only in the trailing text of a labeled
    /// total where the currency marker is often lost by the OCR.
    pub static ref BARE_AMOUNT: Regex = Regex::new(r"\b\d[\d,]*(?:\.\d+)?\b").unwrap();

    /// A line that consists of nothing but an amount, as printed under a
    /// "Total" label row on many forms.
    pub static ref AMOUNT_ONLY_LINE: Regex = Regex::new(
        r"(?i)^\s*(?:₦\s?[\d,]+(?:\.\d+)?|NGN\s?[\d,]+(?:\.\d+)?|[\d,]+(?:\.\d+)?)\s*$",
    )
    .unwrap();

    /// Date token shapes: ISO, numeric day/month/year or month/day/year, and
    /// "10 March 2023". Which shapes parse is decided by the vocabulary's
    /// format list, not by this scanner.
    pub static ref DATE_TOKEN: Regex = Regex::new(
        r"\b(\d{4}-\d{1,2}-\d{1,2}|\d{1,2}[/\-.]\d{1,2}[/\-.]\d{4}|\d{1,2}\s+[A-Za-z]{3,9}\s+\d{4})\b",
    )
    .unwrap();

    /// Two adjacent capitalized tokens, the shape of an unlabeled name.
    pub static ref CAPITALIZED_PAIR: Regex =
        Regex::new(r"\b([A-Z][a-z'\-]+)\s+([A-Z][a-z'\-]+)\b").unwrap();

    /// Inline age forms on a labeled line: "45 years", "45 yrs", "45 y/o".
    pub static ref AGE_INLINE: Regex =
        Regex::new(r"(?i)\b(\d{1,3})\s*(?:years\s*old|yrs\s*old|years|yrs|y/o|yo)\b").unwrap();

    /// Small standalone integer, the shape of an age or a quantity.
    pub static ref SMALL_INTEGER: Regex = Regex::new(r"\b(\d{1,3})\b").unwrap();
}
