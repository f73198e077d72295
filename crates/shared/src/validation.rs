//! Validation traits and violation types for request DTOs.
//!
//! Rules are declared with `#[derive(Validate)]` and evaluated in field
//! declaration order. A validation pass never stops at the first failure:
//! every failing rule contributes one [`Violation`] to the pass's
//! [`Violations`].

use std::borrow::Cow;
use std::fmt;

/// Group a rule belongs to.
///
/// Rules without an explicit group belong to [`Group::Default`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Group {
    /// Rules that apply in every scenario.
    Default,
    /// Rules that only apply when an existing resource is updated.
    Update,
}

/// Call-site scenario selecting which groups are active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Scenario {
    /// Creating a new resource; the identifier is assigned server-side.
    #[default]
    Create,
    /// Updating an existing resource; the identifier must be supplied.
    Update,
}

impl Scenario {
    /// Returns true when rules of `group` are evaluated in this scenario.
    #[must_use]
    pub const fn activates(self, group: Group) -> bool {
        match group {
            Group::Default => true,
            Group::Update => matches!(self, Self::Update),
        }
    }
}

/// A single failed rule: the field path and the rule's message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    path: String,
    message: Cow<'static, str>,
}

impl Violation {
    /// Create a violation for `path`.
    pub fn new(path: impl Into<String>, message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Dotted/indexed field path, e.g. `orgs[0].orgName`.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Human-readable rule message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}: {}", self.path, self.message)
    }
}

/// Ordered violations collected by one validation pass.
///
/// Only the validation machinery in this crate appends to a set; callers
/// receive it by value once the pass is over.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Violations {
    items: Vec<Violation>,
}

impl Violations {
    pub(crate) fn push(&mut self, violation: Violation) {
        self.items.push(violation);
    }

    /// Number of violations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true when no rule failed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterate violations in the order they were reported.
    pub fn iter(&self) -> std::slice::Iter<'_, Violation> {
        self.items.iter()
    }

    /// `Ok(())` for an empty set, otherwise `Err(self)`.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl<'a> IntoIterator for &'a Violations {
    type Item = &'a Violation;
    type IntoIter = std::slice::Iter<'a, Violation>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl FromIterator<Violation> for Violations {
    fn from_iter<I: IntoIterator<Item = Violation>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for Violations {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, violation) in self.items.iter().enumerate() {
            if index > 0 {
                formatter.write_str(", ")?;
            }
            write!(formatter, "{violation}")?;
        }
        Ok(())
    }
}

impl std::error::Error for Violations {}

/// Walk state for one validation pass: active scenario, current path prefix
/// and the violation sink.
#[derive(Debug)]
pub struct ValidationContext<'a> {
    scenario: Scenario,
    prefix: String,
    violations: &'a mut Violations,
}

impl<'a> ValidationContext<'a> {
    /// Start a pass at the root of a DTO graph.
    pub fn new(scenario: Scenario, violations: &'a mut Violations) -> Self {
        Self {
            scenario,
            prefix: String::new(),
            violations,
        }
    }

    /// Scenario of the current pass.
    #[must_use]
    pub const fn scenario(&self) -> Scenario {
        self.scenario
    }

    /// Returns true when a rule declared for `groups` is active.
    #[must_use]
    pub fn applies(&self, groups: &[Group]) -> bool {
        groups.iter().any(|group| self.scenario.activates(*group))
    }

    /// Record a violation for `field` under the current prefix.
    pub fn report(&mut self, field: &str, message: impl Into<Cow<'static, str>>) {
        let path = format!("{}{field}", self.prefix);
        self.violations.push(Violation::new(path, message));
    }

    /// Descend into a nested object reachable through `segment`
    /// (`org` or `orgs[1]`).
    pub fn child(&mut self, segment: &str) -> ValidationContext<'_> {
        ValidationContext {
            scenario: self.scenario,
            prefix: format!("{}{segment}.", self.prefix),
            violations: &mut *self.violations,
        }
    }
}

/// Validate a DTO using compile-time derived rules.
pub trait Validate {
    /// Evaluate every rule of `self` (and nested DTOs) into `ctx`.
    fn validate_with(&self, ctx: &mut ValidationContext<'_>);

    /// Validate the DTO under `scenario`, collecting every violation.
    fn validate(&self, scenario: Scenario) -> Result<(), Violations> {
        let mut violations = Violations::default();
        self.validate_with(&mut ValidationContext::new(scenario, &mut violations));
        violations.into_result()
    }
}

/// Inline validation for bare handler parameters that have no DTO wrapper.
///
/// Paths are recorded as `method.parameter`, the same shape the derive uses
/// for nested fields, so consumers can strip the method prefix.
#[derive(Debug)]
pub struct ParameterCheck {
    method: &'static str,
    violations: Violations,
}

impl ParameterCheck {
    /// Start checking the parameters of `method`.
    #[must_use]
    pub fn new(method: &'static str) -> Self {
        Self {
            method,
            violations: Violations::default(),
        }
    }

    /// Record a violation for `parameter` unless `valid`.
    #[must_use]
    pub fn check(
        mut self,
        parameter: &str,
        valid: bool,
        message: impl Into<Cow<'static, str>>,
    ) -> Self {
        if !valid {
            let path = format!("{}.{parameter}", self.method);
            self.violations.push(Violation::new(path, message));
        }
        self
    }

    /// Finish checking.
    pub fn finish(self) -> Result<(), Violations> {
        self.violations.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Leaf {
        name: &'static str,
    }

    impl Validate for Leaf {
        fn validate_with(&self, ctx: &mut ValidationContext<'_>) {
            if self.name.is_empty() {
                ctx.report("name", "must not be blank");
            }
        }
    }

    struct Root {
        id: Option<u32>,
        leaves: Vec<Leaf>,
    }

    impl Validate for Root {
        fn validate_with(&self, ctx: &mut ValidationContext<'_>) {
            if ctx.applies(&[Group::Update]) && self.id.is_none() {
                ctx.report("id", "must not be null");
            }
            for (index, leaf) in self.leaves.iter().enumerate() {
                leaf.validate_with(&mut ctx.child(&format!("leaves[{index}]")));
            }
        }
    }

    #[test]
    fn scenarios_activate_groups() {
        assert!(Scenario::Create.activates(Group::Default));
        assert!(!Scenario::Create.activates(Group::Update));
        assert!(Scenario::Update.activates(Group::Default));
        assert!(Scenario::Update.activates(Group::Update));
    }

    #[test]
    fn nested_paths_are_prefixed_and_ordered() {
        let root = Root {
            id: None,
            leaves: vec![Leaf { name: "" }, Leaf { name: "ok" }, Leaf { name: "" }],
        };

        assert!(root.validate(Scenario::Create).is_err());
        let Err(violations) = root.validate(Scenario::Update) else {
            panic!("update without id must fail");
        };
        let paths: Vec<&str> = violations.iter().map(Violation::path).collect();
        assert_eq!(paths, vec!["id", "leaves[0].name", "leaves[2].name"]);
        assert_eq!(
            violations.to_string(),
            "id: must not be null, leaves[0].name: must not be blank, leaves[2].name: must not be blank"
        );
    }

    #[test]
    fn parameter_check_records_method_prefixed_paths() {
        let result = ParameterCheck::new("getUser")
            .check("id", false, "must not be null")
            .check("name", true, "unused")
            .finish();

        let Err(violations) = result else {
            panic!("expected a violation");
        };
        assert_eq!(violations.len(), 1);
        assert_eq!(
            violations.iter().next().map(Violation::path),
            Some("getUser.id")
        );
        assert!(ParameterCheck::new("getUser").finish().is_ok());
    }
}
