//! XPath-like path expressions for XML documents.
//!
//! Supported grammar:
//!
//! | Form | Example |
//! |------|---------|
//! | child steps | `ne:services/ne:optical-interfaces/ne:ots` |
//! | descendant steps | `.//ots`, `//ne:ots`, `services//oms` |
//! | absolute | `/ne:ne/ne:services` |
//! | wildcard, self, parent | `*`, `.`, `..` |
//! | equality predicate | `ots[ots-name='OTS-1']`, `x[@type="a"]` |
//! | position predicate | `ots[2]` |
//! | local-name predicate | `*[local-name()='ots']` |
//! | final attribute | `port/@id` |
//!
//! The same parsed steps drive all three resolution tiers.

use std::fmt;

use crate::error::PathError;
use crate::resolve::PathExpression;

/// A possibly prefixed element or attribute name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QName {
    pub prefix: Option<String>,
    pub local: String,
}

impl QName {
    fn parse(raw: &str) -> Result<Self, String> {
        let (prefix, local) = match raw.split_once(':') {
            Some((prefix, local)) => (Some(prefix), local),
            None => (None, raw),
        };
        if let Some(prefix) = prefix {
            check_name(prefix)?;
        }
        check_name(local)?;
        Ok(Self {
            prefix: prefix.map(str::to_string),
            local: local.to_string(),
        })
    }
}

impl fmt::Display for QName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.prefix {
            Some(prefix) => write!(f, "{}:{}", prefix, self.local),
            None => f.write_str(&self.local),
        }
    }
}

fn check_name(name: &str) -> Result<(), String> {
    if name.is_empty() {
        return Err("empty name".to_string());
    }
    if let Some(c) = name
        .chars()
        .find(|c| !(c.is_alphanumeric() || matches!(c, '-' | '_' | '.')))
    {
        return Err(format!("unexpected character '{c}' in name '{name}'"));
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Child,
    Descendant,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Name(QName),
    Wildcard,
    SelfNode,
    Parent,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PredicateKey {
    /// `[name='v']`: a child element's text.
    Child(QName),
    /// `[@name='v']`
    Attribute(QName),
    /// `[local-name()='v']`
    LocalName,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    Equals { key: PredicateKey, value: String },
    /// 1-based.
    Position(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub axis: Axis,
    pub segment: Segment,
    pub predicates: Vec<Predicate>,
}

/// A parsed XML path expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlPath {
    raw: String,
    absolute: bool,
    steps: Vec<Step>,
    attribute: Option<QName>,
}

impl XmlPath {
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Anchored at the document root rather than the context node.
    pub fn is_absolute(&self) -> bool {
        self.absolute
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Final `@attr` step, if any.
    pub fn attribute(&self) -> Option<&QName> {
        self.attribute.as_ref()
    }

    /// A single relative child step such as `alias-name` or `./ne:name`.
    ///
    /// These only ever match direct children of the context node.
    pub fn is_direct_child(&self) -> bool {
        !self.absolute
            && matches!(
                self.steps.as_slice(),
                [Step {
                    axis: Axis::Child,
                    segment: Segment::Name(_),
                    ..
                }]
            )
    }

    /// Every namespace prefix the path refers to.
    pub fn prefixes(&self) -> impl Iterator<Item = &str> {
        let step_prefixes = self.steps.iter().flat_map(|step| {
            let name = match &step.segment {
                Segment::Name(q) => q.prefix.as_deref(),
                _ => None,
            };
            let keys = step.predicates.iter().filter_map(|p| match p {
                Predicate::Equals {
                    key: PredicateKey::Child(q) | PredicateKey::Attribute(q),
                    ..
                } => q.prefix.as_deref(),
                _ => None,
            });
            name.into_iter().chain(keys)
        });
        step_prefixes.chain(self.attribute.iter().filter_map(|q| q.prefix.as_deref()))
    }

    /// The namespace-agnostic rewrite used by the local-name tier.
    ///
    /// `ne:services/ne:ots[ne:ots-name='X']` becomes
    /// `*[local-name()='services']/*[local-name()='ots'][*[local-name()='ots-name']='X']`.
    pub fn local_name_form(&self) -> String {
        let mut out = String::new();
        if self.absolute {
            out.push('/');
        } else if self.steps.first().is_some_and(|s| s.axis == Axis::Descendant) {
            out.push_str("./");
        }
        for (i, step) in self.steps.iter().enumerate() {
            if i > 0 {
                out.push('/');
            }
            if step.axis == Axis::Descendant {
                out.push('/');
            }
            match &step.segment {
                Segment::Name(q) => out.push_str(&local_name_test(&q.local)),
                Segment::Wildcard => out.push('*'),
                Segment::SelfNode => out.push('.'),
                Segment::Parent => out.push_str(".."),
            }
            for predicate in &step.predicates {
                out.push('[');
                match predicate {
                    Predicate::Equals { key, value } => {
                        match key {
                            PredicateKey::Child(q) => out.push_str(&local_name_test(&q.local)),
                            PredicateKey::Attribute(q) => {
                                out.push('@');
                                out.push_str(&q.local);
                            }
                            PredicateKey::LocalName => out.push_str("local-name()"),
                        }
                        out.push('=');
                        out.push_str(&quote(value));
                    }
                    Predicate::Position(n) => out.push_str(&n.to_string()),
                }
                out.push(']');
            }
        }
        if let Some(attr) = &self.attribute {
            if !self.steps.is_empty() {
                out.push('/');
            }
            out.push('@');
            out.push_str(&attr.local);
        }
        out
    }
}

fn local_name_test(local: &str) -> String {
    format!("*[local-name()={}]", quote(local))
}

fn quote(value: &str) -> String {
    if value.contains('\'') {
        format!("\"{value}\"")
    } else {
        format!("'{value}'")
    }
}

impl fmt::Display for XmlPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl PathExpression for XmlPath {
    fn parse(raw: &str) -> Result<Self, PathError> {
        parse_path(raw).map_err(|message| PathError::new(raw, message))
    }
}

fn parse_path(raw: &str) -> Result<XmlPath, String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err("empty path".to_string());
    }

    let (absolute, first_axis, rest) = if let Some(rest) = trimmed.strip_prefix("//") {
        (true, Axis::Descendant, rest)
    } else if let Some(rest) = trimmed.strip_prefix('/') {
        (true, Axis::Child, rest)
    } else if let Some(rest) = trimmed.strip_prefix(".//") {
        (false, Axis::Descendant, rest)
    } else if let Some(rest) = trimmed.strip_prefix("./") {
        (false, Axis::Child, rest)
    } else {
        (false, Axis::Child, trimmed)
    };

    if rest.trim().is_empty() {
        return Err("empty path".to_string());
    }

    let pieces = split_steps(rest)?;
    let last = pieces.len().saturating_sub(1);
    let mut steps = Vec::new();
    let mut attribute = None;
    let mut axis = first_axis;

    for (i, piece) in pieces.iter().enumerate() {
        let piece = piece.trim();
        if piece.is_empty() {
            if i == 0 || i == last || axis == Axis::Descendant {
                return Err("empty step".to_string());
            }
            axis = Axis::Descendant;
            continue;
        }
        if let Some(name) = piece.strip_prefix('@') {
            if i != last {
                return Err("attribute step must be last".to_string());
            }
            if axis == Axis::Descendant {
                return Err("descendant attribute steps are not supported".to_string());
            }
            attribute = Some(QName::parse(name)?);
            continue;
        }
        steps.push(parse_step(piece, axis)?);
        axis = Axis::Child;
    }

    if steps.is_empty() && attribute.is_none() {
        return Err("empty path".to_string());
    }

    Ok(XmlPath {
        raw: trimmed.to_string(),
        absolute,
        steps,
        attribute,
    })
}

/// Splits on `/` outside brackets and quotes.
fn split_steps(input: &str) -> Result<Vec<&str>, String> {
    let mut pieces = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut start = 0;

    for (i, c) in input.char_indices() {
        if let Some(q) = quote {
            if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '\'' | '"' if depth > 0 => quote = Some(c),
            '[' => depth += 1,
            ']' => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| "unbalanced ']'".to_string())?;
            }
            '/' if depth == 0 => {
                pieces.push(&input[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }

    if quote.is_some() {
        return Err("unterminated quote".to_string());
    }
    if depth > 0 {
        return Err("unbalanced '['".to_string());
    }
    pieces.push(&input[start..]);
    Ok(pieces)
}

fn parse_step(piece: &str, axis: Axis) -> Result<Step, String> {
    let (name, mut rest) = match piece.find('[') {
        Some(idx) => (&piece[..idx], &piece[idx..]),
        None => (piece, ""),
    };

    let segment = match name.trim() {
        "." => Segment::SelfNode,
        ".." => Segment::Parent,
        "*" => Segment::Wildcard,
        other => Segment::Name(QName::parse(other)?),
    };

    let mut predicates = Vec::new();
    while !rest.is_empty() {
        let inner = rest
            .strip_prefix('[')
            .ok_or_else(|| format!("unexpected text '{rest}' after predicate"))?;
        let close = closing_bracket(inner).ok_or_else(|| "unbalanced '['".to_string())?;
        predicates.push(parse_predicate(&inner[..close])?);
        rest = inner[close + 1..].trim_start();
    }

    if !predicates.is_empty() && matches!(segment, Segment::SelfNode | Segment::Parent) {
        return Err("predicates are not allowed on '.' or '..'".to_string());
    }

    Ok(Step {
        axis,
        segment,
        predicates,
    })
}

/// Index of the `]` closing a predicate body, skipping quoted text.
fn closing_bracket(body: &str) -> Option<usize> {
    let mut quote: Option<char> = None;
    let mut depth = 0usize;
    for (i, c) in body.char_indices() {
        if let Some(q) = quote {
            if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '\'' | '"' => quote = Some(c),
            '[' => depth += 1,
            ']' if depth == 0 => return Some(i),
            ']' => depth -= 1,
            _ => {}
        }
    }
    None
}

fn parse_predicate(body: &str) -> Result<Predicate, String> {
    let body = body.trim();
    if body.is_empty() {
        return Err("empty predicate".to_string());
    }
    if body.chars().all(|c| c.is_ascii_digit()) {
        let n: usize = body
            .parse()
            .map_err(|_| format!("position '{body}' out of range"))?;
        if n == 0 {
            return Err("positions start at 1".to_string());
        }
        return Ok(Predicate::Position(n));
    }

    let (lhs, rhs) = body
        .split_once('=')
        .ok_or_else(|| format!("unsupported predicate '[{body}]'"))?;
    let lhs = lhs.trim();
    let rhs = rhs.trim();

    let value = unquote(rhs).ok_or_else(|| format!("predicate value {rhs} must be quoted"))?;
    let key = if lhs == "local-name()" {
        PredicateKey::LocalName
    } else if let Some(attr) = lhs.strip_prefix('@') {
        PredicateKey::Attribute(QName::parse(attr)?)
    } else {
        PredicateKey::Child(
            QName::parse(lhs).map_err(|e| format!("unsupported predicate '[{body}]': {e}"))?,
        )
    };

    Ok(Predicate::Equals {
        key,
        value: value.to_string(),
    })
}

fn unquote(raw: &str) -> Option<&str> {
    ['\'', '"'].iter().find_map(|q| {
        raw.strip_prefix(*q)
            .and_then(|s| s.strip_suffix(*q))
            .filter(|inner| !inner.contains(*q))
    })
}
