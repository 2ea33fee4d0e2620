//! Priority-ordered classification of a selection
//!
//! A [`ClassificationChain`] owns one checker per descriptor and asks them in
//! ascending priority; the first match decides. [`DEFAULT_PRIORITIES`] is the
//! order used by the pipeline, but any descriptor list can be injected.

use crate::checkers::{checker_for, CheckContext, PatternChecker};
use tracepin_foundation::{LogMessage, LogMessageType};
use tracing::debug;

/// A checker's place in the chain; lower priorities are asked first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckerDescriptor {
    pub log_message_type: LogMessageType,
    pub priority: u32,
}

impl CheckerDescriptor {
    pub const fn new(log_message_type: LogMessageType, priority: u32) -> Self {
        Self {
            log_message_type,
            priority,
        }
    }
}

pub const DEFAULT_PRIORITIES: [CheckerDescriptor; 13] = [
    CheckerDescriptor::new(LogMessageType::ArrayAssignment, 0),
    CheckerDescriptor::new(LogMessageType::BinaryExpression, 1),
    CheckerDescriptor::new(LogMessageType::FunctionCallAssignment, 2),
    CheckerDescriptor::new(LogMessageType::FunctionParameter, 3),
    CheckerDescriptor::new(LogMessageType::NamedFunctionAssignment, 4),
    CheckerDescriptor::new(LogMessageType::ObjectFunctionCallAssignment, 5),
    CheckerDescriptor::new(LogMessageType::ObjectLiteral, 6),
    CheckerDescriptor::new(LogMessageType::PropertyAccessAssignment, 7),
    CheckerDescriptor::new(LogMessageType::TemplateString, 8),
    CheckerDescriptor::new(LogMessageType::Ternary, 9),
    CheckerDescriptor::new(LogMessageType::RawPropertyAccess, 10),
    CheckerDescriptor::new(LogMessageType::PropertyMethodCall, 11),
    CheckerDescriptor::new(LogMessageType::PrimitiveAssignment, 12),
];

pub struct ClassificationChain {
    checkers: Vec<Box<dyn PatternChecker>>,
}

impl ClassificationChain {
    /// Builds a chain from `descriptors`, sorted by priority.
    ///
    /// Ties keep their input order. Duplicate types are asked once.
    pub fn new(descriptors: &[CheckerDescriptor]) -> Self {
        let mut ordered = descriptors.to_vec();
        ordered.sort_by_key(|d| d.priority);
        let mut checkers: Vec<Box<dyn PatternChecker>> = Vec::with_capacity(ordered.len());
        for descriptor in ordered {
            if checkers
                .iter()
                .all(|c| c.log_message_type() != descriptor.log_message_type)
            {
                checkers.push(checker_for(descriptor.log_message_type));
            }
        }
        Self { checkers }
    }

    /// Message types in the order they are asked.
    pub fn order(&self) -> Vec<LogMessageType> {
        self.checkers.iter().map(|c| c.log_message_type()).collect()
    }

    /// The first matching classification, or `PrimitiveAssignment`.
    pub fn classify(&self, ctx: &CheckContext<'_>) -> LogMessage {
        for checker in &self.checkers {
            let outcome = checker.check(ctx);
            if outcome.is_checked {
                debug!(
                    log_message_type = %checker.log_message_type(),
                    line = ctx.selection_line,
                    variable = ctx.variable,
                    "Selection classified"
                );
                return LogMessage::with_metadata(checker.log_message_type(), outcome.metadata);
            }
        }
        LogMessage::new(LogMessageType::PrimitiveAssignment)
    }
}

impl Default for ClassificationChain {
    fn default() -> Self {
        Self::new(&DEFAULT_PRIORITIES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracepin_ast::parse_script;
    use tracepin_foundation::ScriptDialect;

    fn classify_with(chain: &ClassificationChain, source: &str, line: usize, variable: &str) -> LogMessage {
        let ast = parse_script(source, ScriptDialect::TypeScript).unwrap();
        chain.classify(&CheckContext {
            ast: &ast,
            document: source,
            selection_line: line,
            variable,
        })
    }

    fn classify(source: &str, line: usize, variable: &str) -> LogMessageType {
        classify_with(&ClassificationChain::default(), source, line, variable).log_message_type
    }

    #[test]
    fn test_default_order_matches_descriptor_list() {
        let expected: Vec<_> = DEFAULT_PRIORITIES.iter().map(|d| d.log_message_type).collect();
        assert_eq!(ClassificationChain::default().order(), expected);
    }

    #[test]
    fn test_chain_sorts_by_priority() {
        let chain = ClassificationChain::new(&[
            CheckerDescriptor::new(LogMessageType::PrimitiveAssignment, 9),
            CheckerDescriptor::new(LogMessageType::Ternary, 1),
        ]);
        assert_eq!(
            chain.order(),
            vec![LogMessageType::Ternary, LogMessageType::PrimitiveAssignment]
        );
    }

    #[test]
    fn test_each_family() {
        assert_eq!(classify("const a = [1];", 0, "a"), LogMessageType::ArrayAssignment);
        assert_eq!(classify("const a = b * c;", 0, "a"), LogMessageType::BinaryExpression);
        assert_eq!(classify("const a = load();", 0, "a"), LogMessageType::FunctionCallAssignment);
        assert_eq!(classify("function f(a) {}", 0, "a"), LogMessageType::FunctionParameter);
        assert_eq!(classify("const a = () => 1;", 0, "a"), LogMessageType::NamedFunctionAssignment);
        assert_eq!(
            classify("const a = db.find();", 0, "a"),
            LogMessageType::ObjectFunctionCallAssignment
        );
        assert_eq!(classify("const a = { b: 1 };", 0, "a"), LogMessageType::ObjectLiteral);
        assert_eq!(classify("const a = b.c;", 0, "a"), LogMessageType::PropertyAccessAssignment);
        assert_eq!(classify("const a = `x`;", 0, "a"), LogMessageType::TemplateString);
        assert_eq!(classify("const a = b ? 1 : 2;", 0, "a"), LogMessageType::Ternary);
        assert_eq!(classify("print(a.b);", 0, "b"), LogMessageType::RawPropertyAccess);
        assert_eq!(classify("a.b.run();", 0, "b"), LogMessageType::RawPropertyAccess);
        assert_eq!(classify("a.run();", 0, "a"), LogMessageType::PropertyMethodCall);
        assert_eq!(classify("const a = 42;", 0, "a"), LogMessageType::PrimitiveAssignment);
    }

    #[test]
    fn test_no_checker_matches_falls_back_to_primitive() {
        let chain = ClassificationChain::new(&[CheckerDescriptor::new(LogMessageType::ArrayAssignment, 0)]);
        let message = classify_with(&chain, "let count = 1;", 0, "count");
        assert_eq!(message.log_message_type, LogMessageType::PrimitiveAssignment);
        assert_eq!(message.metadata, None);
    }

    #[test]
    fn test_earlier_priority_wins_and_reordering_flips_it() {
        // `item` is both a parameter and bound to an array on line 0
        let source = "function f(item) { item = [item]; }";
        assert_eq!(classify(source, 0, "item"), LogMessageType::ArrayAssignment);

        let reordered = ClassificationChain::new(&[
            CheckerDescriptor::new(LogMessageType::FunctionParameter, 0),
            CheckerDescriptor::new(LogMessageType::ArrayAssignment, 1),
        ]);
        assert_eq!(
            classify_with(&reordered, source, 0, "item").log_message_type,
            LogMessageType::FunctionParameter
        );
    }
}
