//! Currency rendering for dashboard figures.

/// Locale-aware separators used when rendering amounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocaleFormat {
    pub decimal_separator: char,
    pub grouping_separator: char,
}

impl Default for LocaleFormat {
    fn default() -> Self {
        Self {
            decimal_separator: '.',
            grouping_separator: ',',
        }
    }
}

impl LocaleFormat {
    /// Picks separators from a BCP 47 tag such as `en-US` or `de-DE`.
    pub fn for_locale(tag: &str) -> Self {
        let language = tag
            .split(|c: char| c == '-' || c == '_')
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        match language.as_str() {
            "de" | "es" | "it" | "nl" | "pt" | "id" | "tr" => Self {
                decimal_separator: ',',
                grouping_separator: '.',
            },
            "fr" | "sv" | "nb" | "fi" | "pl" | "cs" => Self {
                decimal_separator: ',',
                grouping_separator: ' ',
            },
            _ => Self::default(),
        }
    }
}

/// Currency code plus locale, everything needed to render an amount.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrencyFormat {
    pub code: String,
    pub locale: LocaleFormat,
}

impl Default for CurrencyFormat {
    fn default() -> Self {
        Self {
            code: "USD".into(),
            locale: LocaleFormat::default(),
        }
    }
}

impl CurrencyFormat {
    pub fn new(code: &str, locale_tag: &str) -> Self {
        Self {
            code: code.trim().to_ascii_uppercase(),
            locale: LocaleFormat::for_locale(locale_tag),
        }
    }

    /// `$1,234.50` style text; negatives carry a leading `-`.
    pub fn format(&self, amount: f64) -> String {
        let precision = minor_units_for(&self.code);
        let body = format_number(&self.locale, amount.abs(), precision);
        let symbol = symbol_for(&self.code);
        let is_zero = body.chars().all(|c| !c.is_ascii_digit() || c == '0');
        let sign = if amount < 0.0 && !is_zero { "-" } else { "" };
        if symbol.chars().count() > 1 && symbol.chars().all(|c| c.is_ascii_uppercase()) {
            format!("{sign}{symbol} {body}")
        } else {
            format!("{sign}{symbol}{body}")
        }
    }
}

pub fn symbol_for(code: &str) -> String {
    match code {
        "USD" => "$".into(),
        "EUR" => "€".into(),
        "GBP" => "£".into(),
        "JPY" => "¥".into(),
        "AUD" => "A$".into(),
        _ => code.into(),
    }
}

pub fn minor_units_for(code: &str) -> u8 {
    match code {
        "JPY" => 0,
        "KWD" | "BHD" => 3,
        _ => 2,
    }
}

pub fn format_number(locale: &LocaleFormat, value: f64, precision: u8) -> String {
    let rendered = format!("{:.*}", precision as usize, value);
    let (int_part, fraction) = match rendered.split_once('.') {
        Some((int_part, fraction)) => (int_part, Some(fraction)),
        None => (rendered.as_str(), None),
    };
    let (sign, digits) = match int_part.strip_prefix('-') {
        Some(digits) => ("-", digits),
        None => ("", int_part),
    };
    let mut body = format!("{}{}", sign, group_digits(digits, locale.grouping_separator));
    if let Some(fraction) = fraction {
        body.push(locale.decimal_separator);
        body.push_str(fraction);
    }
    body
}

fn group_digits(digits: &str, separator: char) -> String {
    let mut grouped = String::new();
    for (count, ch) in digits.chars().rev().enumerate() {
        if count != 0 && count % 3 == 0 {
            grouped.insert(0, separator);
        }
        grouped.insert(0, ch);
    }
    grouped
}
