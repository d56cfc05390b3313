//! License data structures and SPDX expression handling.
//!
//! Uses the `spdx` crate for expression parsing and license classification.
//! Expressions that do not parse are kept verbatim and treated as
//! non-standard.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Values that SPDX uses to say "nothing is known here"
const NO_ASSERTION_VALUES: &[&str] = &["NOASSERTION", "NONE", ""];

/// License expression following SPDX license expression syntax
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LicenseExpression {
    /// The raw license expression string
    pub expression: String,
    /// Whether this is a valid SPDX expression
    pub is_valid_spdx: bool,
}

impl LicenseExpression {
    /// Create a new license expression
    pub fn new(expression: impl Into<String>) -> Self {
        let expression = expression.into();
        let is_valid_spdx = Self::validate_spdx(&expression);
        Self {
            expression,
            is_valid_spdx,
        }
    }

    /// Validate an SPDX expression using the spdx crate.
    ///
    /// Lax mode accepts common spellings such as "Apache2" or "/" for OR.
    fn validate_spdx(expr: &str) -> bool {
        if Self::is_no_assertion_str(expr) {
            return false;
        }
        spdx::Expression::parse_mode(expr, spdx::ParseMode::LAX).is_ok()
    }

    fn is_no_assertion_str(expr: &str) -> bool {
        let trimmed = expr.trim();
        NO_ASSERTION_VALUES
            .iter()
            .any(|v| trimmed.eq_ignore_ascii_case(v))
    }

    /// True for NOASSERTION / NONE / empty values
    #[must_use]
    pub fn is_no_assertion(&self) -> bool {
        Self::is_no_assertion_str(&self.expression)
    }

    /// Whether any license id, as written, is deprecated on the SPDX list.
    ///
    /// Raw tokens are checked rather than the lax parse, which folds
    /// `GPL-2.0-only` onto the deprecated `GPL-2.0`.
    #[must_use]
    pub fn is_deprecated(&self) -> bool {
        if self.is_no_assertion() {
            return false;
        }
        self.expression
            .split(|c: char| c.is_whitespace() || c == '(' || c == ')')
            .filter(|tok| !tok.is_empty())
            .any(|tok| spdx::license_id(tok).is_some_and(|id| id.is_deprecated()))
    }

    /// Whether no choice within the expression avoids copyleft terms.
    ///
    /// For `MIT OR GPL-2.0` the licensee can pick MIT, so the expression is
    /// not restrictive. Non-SPDX references count as acceptable.
    #[must_use]
    pub fn is_restrictive(&self) -> bool {
        let Ok(expr) = spdx::Expression::parse_mode(&self.expression, spdx::ParseMode::LAX) else {
            let lower = self.expression.to_lowercase();
            return lower.contains("gpl") || lower.contains("sspl") || lower.contains("cc-by-nc");
        };
        !expr.evaluate(|req| {
            !matches!(req.license, spdx::LicenseItem::Spdx { id, .. } if id.is_copyleft())
        })
    }
}

impl fmt::Display for LicenseExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.expression)
    }
}

/// License information for a component
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LicenseInfo {
    /// Declared licenses (from the package author)
    pub declared: Vec<LicenseExpression>,
    /// Concluded license (after analysis)
    pub concluded: Option<LicenseExpression>,
}

impl LicenseInfo {
    /// All license expressions that carry an actual assertion
    pub fn asserted(&self) -> impl Iterator<Item = &LicenseExpression> {
        self.declared
            .iter()
            .chain(self.concluded.iter())
            .filter(|l| !l.is_no_assertion())
    }

    /// Whether any license is asserted at all
    #[must_use]
    pub fn has_any(&self) -> bool {
        self.asserted().next().is_some()
    }

    /// Whether a declared (author-stated) license is asserted
    #[must_use]
    pub fn has_declared(&self) -> bool {
        self.declared.iter().any(|l| !l.is_no_assertion())
    }

    /// Whether a concluded license is asserted
    #[must_use]
    pub fn has_concluded(&self) -> bool {
        self.concluded.as_ref().is_some_and(|l| !l.is_no_assertion())
    }
}
