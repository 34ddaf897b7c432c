use std::fmt;

/// Source location span for parse-error reporting
/// Represents a range of characters in the sanitized input string
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    /// Start position (0-indexed byte offset)
    pub start: usize,
    /// End position (exclusive, 0-indexed byte offset)
    pub end: usize,
}

impl Span {
    /// Create a new span
    pub fn new(start: usize, end: usize) -> Self {
        Span { start, end }
    }

    /// Create a span for a single position
    pub fn at(pos: usize) -> Self {
        Span {
            start: pos,
            end: pos + 1,
        }
    }

    /// Check if this span has valid location info
    pub fn is_valid(&self) -> bool {
        self.end > self.start
    }

    /// Format the span for display (1-indexed for users)
    pub fn display(&self) -> String {
        if !self.is_valid() {
            String::new()
        } else if self.end - self.start == 1 {
            format!(" at position {}", self.start + 1)
        } else {
            format!(" at positions {}-{}", self.start + 1, self.end)
        }
    }
}

/// Errors that can occur while parsing, classifying or solving a polynomial
#[derive(Debug, Clone, PartialEq)]
pub enum QuizError {
    /// Input cannot be interpreted as a univariate polynomial
    MalformedPolynomial {
        msg: String,
        span: Option<Span>,
    },

    /// Method label outside the four known values
    UnsupportedMethod {
        label: String,
    },

    /// Newton iteration failed to converge
    NumericDivergence {
        guess: f64,
        iterations: usize,
        reason: String,
    },

    /// Umbrella for any failure during quiz generation, carrying the cause's message
    QuizGeneration {
        message: String,
    },

    /// Feature vector length disagrees with the classifier's trained dimensionality
    DimensionMismatch {
        expected: usize,
        actual: usize,
    },

    /// Classifier artifact could not be loaded or is internally inconsistent
    InvalidModel {
        msg: String,
    },

    // Safety limit
    MaxDegreeExceeded {
        degree: usize,
        limit: usize,
    },
}

impl QuizError {
    /// Create a MalformedPolynomial error without location info
    pub fn malformed(msg: impl Into<String>) -> Self {
        QuizError::MalformedPolynomial {
            msg: msg.into(),
            span: None,
        }
    }

    /// Create a MalformedPolynomial error with a span
    pub fn malformed_at(msg: impl Into<String>, span: Span) -> Self {
        QuizError::MalformedPolynomial {
            msg: msg.into(),
            span: Some(span),
        }
    }

    /// Wrap any error's message into the QuizGeneration umbrella
    pub fn generation(cause: &dyn fmt::Display) -> Self {
        QuizError::QuizGeneration {
            message: format!("Erreur lors de la génération du quiz : {}", cause),
        }
    }

    /// Stable machine-readable kind, paired with `Display` for the
    /// `{kind, message}` structure callers map to client errors
    pub fn kind(&self) -> &'static str {
        match self {
            QuizError::MalformedPolynomial { .. } => "MalformedPolynomialError",
            QuizError::UnsupportedMethod { .. } => "UnsupportedMethodError",
            QuizError::NumericDivergence { .. } => "NumericDivergenceError",
            QuizError::QuizGeneration { .. } => "QuizGenerationError",
            QuizError::DimensionMismatch { .. } => "DimensionMismatchError",
            QuizError::InvalidModel { .. } => "InvalidModelError",
            QuizError::MaxDegreeExceeded { .. } => "MaxDegreeExceededError",
        }
    }
}

impl fmt::Display for QuizError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuizError::MalformedPolynomial { msg, span } => {
                write!(
                    f,
                    "Malformed polynomial: {}{}",
                    msg,
                    span.map_or(String::new(), |s| s.display())
                )
            }
            QuizError::UnsupportedMethod { label } => {
                write!(f, "Unsupported method label: '{}'", label)
            }
            QuizError::NumericDivergence {
                guess,
                iterations,
                reason,
            } => {
                write!(
                    f,
                    "Newton iteration from x0 = {} did not converge after {} iterations: {}",
                    guess, iterations, reason
                )
            }
            QuizError::QuizGeneration { message } => write!(f, "{}", message),
            QuizError::DimensionMismatch { expected, actual } => {
                write!(
                    f,
                    "Feature vector dimension mismatch: classifier expects {}, got {}",
                    expected, actual
                )
            }
            QuizError::InvalidModel { msg } => {
                write!(f, "Invalid classifier artifact: {}", msg)
            }
            QuizError::MaxDegreeExceeded { degree, limit } => {
                write!(
                    f,
                    "Polynomial degree {} exceeds maximum supported degree {}",
                    degree, limit
                )
            }
        }
    }
}

impl std::error::Error for QuizError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_display() {
        assert_eq!(Span::at(3).display(), " at position 4");
        assert_eq!(Span::new(2, 5).display(), " at positions 3-5");
        assert_eq!(Span::default().display(), "");
    }

    #[test]
    fn test_error_kinds() {
        assert_eq!(
            QuizError::malformed("bad").kind(),
            "MalformedPolynomialError"
        );
        assert_eq!(
            QuizError::UnsupportedMethod {
                label: "Cardan".into()
            }
            .kind(),
            "UnsupportedMethodError"
        );
    }

    #[test]
    fn test_generation_wraps_cause_message() {
        let cause = QuizError::malformed("symbole inconnu 'y'");
        let wrapped = QuizError::generation(&cause);
        let msg = wrapped.to_string();
        assert!(msg.starts_with("Erreur lors de la génération du quiz"));
        assert!(msg.contains("symbole inconnu"));
    }
}
