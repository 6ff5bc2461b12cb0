use super::DataTransformer;
use crate::error::TransformationFailed;
use crate::value::Value;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RoundingMode {
    Ceiling,
    Floor,
    /// Away from zero.
    Up,
    /// Towards zero.
    Down,
    HalfEven,
    #[default]
    HalfUp,
    HalfDown,
}

impl RoundingMode {
    fn apply(&self, n: f64) -> f64 {
        match self {
            RoundingMode::Ceiling => n.ceil(),
            RoundingMode::Floor => n.floor(),
            RoundingMode::Up => {
                if n > 0.0 {
                    n.ceil()
                } else {
                    n.floor()
                }
            }
            RoundingMode::Down => n.trunc(),
            RoundingMode::HalfEven => n.round_ties_even(),
            RoundingMode::HalfUp => n.round(),
            RoundingMode::HalfDown => {
                if (n - n.trunc()).abs() == 0.5 {
                    n.trunc()
                } else {
                    n.round()
                }
            }
        }
    }
}

/// Inserts `,` between every group of three integer digits.
fn group_thousands(digits: &str) -> String {
    let (sign, digits) = match digits.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", digits),
    };
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    format!("{}{}", sign, grouped)
}

/// Splits the numeric prefix (`[+-]digits[.digits]`) from the remainder.
fn split_numeric_prefix(input: &str) -> (&str, &str) {
    let bytes = input.as_bytes();
    let mut end = 0;
    if end < bytes.len() && (bytes[end] == b'-' || bytes[end] == b'+') {
        end += 1;
    }
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    if end < bytes.len() && bytes[end] == b'.' {
        end += 1;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
        }
    }
    input.split_at(end)
}

/// Parses an en_US style number: `,` groups thousands when grouping is on and
/// is read as the decimal separator otherwise.
fn parse_number(value: &str, grouping: bool) -> Result<f64, TransformationFailed> {
    let value = value.trim();
    if value == "NaN" {
        return Err(TransformationFailed::new("\"NaN\" is not a valid number"));
    }

    let normalized = if grouping { value.replace(',', "") } else { value.replace(',', ".") };
    let (number, remainder) = split_numeric_prefix(&normalized);
    if !number.bytes().any(|b| b.is_ascii_digit()) {
        return Err(TransformationFailed::new(format!("\"{}\" is not a valid number", value)));
    }

    let remainder = remainder.trim_matches(|c: char| c.is_whitespace() || c == '\u{a0}');
    if !remainder.is_empty() {
        return Err(TransformationFailed::new(format!("The number contains unrecognized characters: \"{}\"", remainder)));
    }

    let result: f64 = number.parse().map_err(|_| TransformationFailed::new(format!("\"{}\" is not a valid number", value)))?;
    if !result.is_finite() || result.abs() >= i64::MAX as f64 {
        return Err(TransformationFailed::new("The number is too large to be represented"));
    }
    Ok(result)
}

/// Whole numbers, optionally rendered with thousands grouping.
#[derive(Debug, Clone, Copy, Default)]
pub struct IntegerTransformer {
    pub grouping: bool,
}

impl IntegerTransformer {
    pub fn new() -> Self { Self::default() }

    pub fn with_grouping(mut self, grouping: bool) -> Self {
        self.grouping = grouping;
        self
    }
}

impl DataTransformer for IntegerTransformer {
    fn transform(&self, value: &Value) -> Result<String, TransformationFailed> {
        let Value::Integer(i) = value else {
            return Err(TransformationFailed::new("Expected an integer."));
        };
        Ok(if self.grouping { group_thousands(&i.to_string()) } else { i.to_string() })
    }

    fn reverse_transform(&self, value: &str) -> Result<Value, TransformationFailed> {
        let number = parse_number(value, self.grouping)?;
        if number.fract() != 0.0 {
            return Err(TransformationFailed::new(format!("\"{}\" is not a whole number", value.trim())));
        }
        Ok(Value::Integer(number as i64))
    }
}

/// Decimal numbers with an optional fixed precision.
#[derive(Debug, Clone, Copy, Default)]
pub struct NumberToStringTransformer {
    pub precision: Option<u32>,
    pub grouping: bool,
    pub rounding_mode: RoundingMode,
}

impl NumberToStringTransformer {
    pub fn new() -> Self { Self::default() }

    pub fn with_precision(mut self, precision: u32) -> Self {
        self.precision = Some(precision);
        self
    }

    pub fn with_grouping(mut self, grouping: bool) -> Self {
        self.grouping = grouping;
        self
    }

    pub fn with_rounding_mode(mut self, rounding_mode: RoundingMode) -> Self {
        self.rounding_mode = rounding_mode;
        self
    }

    fn round(&self, number: f64) -> f64 {
        match self.precision {
            Some(precision) => {
                let coefficient = 10f64.powi(precision as i32);
                self.rounding_mode.apply(number * coefficient) / coefficient
            }
            None => number,
        }
    }
}

impl DataTransformer for NumberToStringTransformer {
    fn transform(&self, value: &Value) -> Result<String, TransformationFailed> {
        let number = match value {
            Value::Float(f) => *f,
            Value::Integer(i) => *i as f64,
            _ => return Err(TransformationFailed::new("Expected a numeric.")),
        };
        let number = self.round(number);
        let formatted = match self.precision {
            Some(precision) => format!("{:.*}", precision as usize, number),
            None => number.to_string(),
        };
        if !self.grouping {
            return Ok(formatted);
        }
        Ok(match formatted.split_once('.') {
            Some((int, fraction)) => format!("{}.{}", group_thousands(int), fraction),
            None => group_thousands(&formatted),
        })
    }

    fn reverse_transform(&self, value: &str) -> Result<Value, TransformationFailed> {
        Ok(Value::Float(self.round(parse_number(value, self.grouping)?)))
    }
}
