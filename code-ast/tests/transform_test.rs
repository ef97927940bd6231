//! Tests for transformers and edit reconciliation on Python sources.
#![cfg(feature = "python")]
#![allow(clippy::unwrap_used)]

use code_ast::transform::{FormattedReplacement, TransformCollector};
use code_ast::{
    parse, Ancestors, AstError, EditDirective, EditMap, HandlerResult, Handlers, Node, Slot,
    Visitor,
};

/// Swaps the operands of every `+`.
struct SwapAddition;

impl SwapAddition {
    fn leave_binary_operator(
        &mut self,
        node: Node<'_>,
        _: Ancestors<'_, '_>,
    ) -> HandlerResult<Option<EditDirective>> {
        let operator = node.child(1).map(|op| op.kind());
        if operator != Some("+") {
            return Ok(None);
        }
        let (Some(left), Some(right)) = (node.child(0), node.child(2)) else {
            return Ok(None);
        };
        Ok(Some(EditDirective::formatted("%s + %s", [right, left])?))
    }
}

impl Visitor for SwapAddition {
    type Output = EditDirective;

    fn handlers(&self) -> Handlers<Self> {
        Handlers::new().leave("binary_operator", Self::leave_binary_operator)
    }
}

/// Renames identifiers according to a fixed table.
struct Rename(&'static [(&'static str, &'static str)]);

impl Rename {
    fn leave_identifier(
        &mut self,
        node: Node<'_>,
        _: Ancestors<'_, '_>,
    ) -> HandlerResult<Option<EditDirective>> {
        Ok(self
            .0
            .iter()
            .find(|(from, _)| *from == node.text())
            .map(|(_, to)| EditDirective::literal(*to)))
    }
}

impl Visitor for Rename {
    type Output = EditDirective;

    fn handlers(&self) -> Handlers<Self> {
        Handlers::new().leave("identifier", Self::leave_identifier)
    }
}

#[test]
fn test_swap_operands_in_function() {
    let tree = parse("def foo(x, y):\n return x + y", "python").unwrap();
    let output = tree.transform(&mut SwapAddition).unwrap();
    assert_eq!(output, "def foo(x, y):\n return y + x");
}

#[test]
fn test_nested_edits_compose() {
    let tree = parse("total = a + b * c + d\n", "python").unwrap();
    let output = tree.transform(&mut SwapAddition).unwrap();
    // ((a + b*c) + d) -> (d + (b*c + a))
    assert_eq!(output, "total = d + b * c + a\n");
}

#[test]
fn test_untouched_source_is_byte_identical() {
    let sources = [
        "# comment\n\nclass A:\n\n    def m(self):   # trailing\n        return 1\n",
        "\n\nx = 1\n",
        "   x = 1",
        "\n# c\n\nx = 1",
        "x = 1\n\n\n",
        "x = 1\n   \n",
        "name = 'héllo wörld'  # ünïcode ✓\nπ = 3.14\n",
    ];
    for source in sources {
        let tree = parse(source, "python").unwrap();
        assert_eq!(tree.transform(&mut SwapAddition).unwrap(), source, "{source:?}");
        assert_eq!(tree.reconcile(&EditMap::new()).unwrap(), source, "{source:?}");
    }
}

#[test]
fn test_edits_keep_text_around_the_module() {
    let tree = parse("\n\nz = a + b\n\n", "python").unwrap();
    assert!(tree.root().start_byte() > 0);
    assert_eq!(tree.transform(&mut SwapAddition).unwrap(), "\n\nz = b + a\n\n");

    let tree = parse("  \n# header\nz = 1\n", "python").unwrap();
    let mut edits = EditMap::new();
    edits.insert(tree.root().id(), EditDirective::literal("pass\n"));
    assert!(tree.reconcile(&edits).unwrap().ends_with("pass\n"));
}

#[test]
fn test_deeply_nested_expression() {
    let depth = 2000;
    let source = format!("x = {}a + b{}\n", "(".repeat(depth), ")".repeat(depth));
    let tree = parse(&source, "python").unwrap();
    assert_eq!(tree.reconcile(&EditMap::new()).unwrap(), source);

    let expected = format!("x = {}b + a{}\n", "(".repeat(depth), ")".repeat(depth));
    assert_eq!(tree.transform(&mut SwapAddition).unwrap(), expected);
}

#[test]
fn test_literal_replacements_keep_layout() {
    let tree = parse("def f(a, b):\n    return a  +  b\n", "python").unwrap();
    let output = tree.transform(&mut Rename(&[("a", "first"), ("b", "second")])).unwrap();
    assert_eq!(output, "def f(first, second):\n    return first  +  second\n");
}

#[test]
fn test_literal_on_root() {
    let tree = parse("x = 1\n", "python").unwrap();
    let mut edits = EditMap::new();
    edits.insert(tree.root().id(), EditDirective::literal("pass"));
    assert_eq!(tree.reconcile(&edits).unwrap(), "pass");
}

#[test]
fn test_later_directive_wins() {
    let tree = parse("x + y", "python").unwrap();
    let mut edits = tree.collect_edits(&mut SwapAddition).unwrap();
    assert_eq!(edits.len(), 1);
    let binary = tree.root().find_by_kind("binary_operator")[0];
    edits.insert(binary.id(), EditDirective::literal("0"));
    assert_eq!(tree.reconcile(&edits).unwrap(), "0");
}

#[test]
fn test_collector_over_two_transformers() {
    let tree = parse("a + b", "python").unwrap();
    let mut swap = SwapAddition;
    let mut collector = TransformCollector::new(&mut swap);
    collector.run(tree.root()).unwrap();

    let mut rename = Rename(&[("a", "alpha")]);
    let mut collector = TransformCollector::with_edits(&mut rename, collector.into_edits());
    collector.run(tree.root()).unwrap();

    assert_eq!(tree.reconcile(collector.edits()).unwrap(), "b + alpha");
}

#[test]
fn test_failing_leave_handler_aborts_transform() {
    #[derive(Debug)]
    struct Refused;

    impl std::fmt::Display for Refused {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str("refused")
        }
    }

    impl std::error::Error for Refused {}

    #[derive(Default)]
    struct FailOnCall {
        renamed: usize,
    }

    impl FailOnCall {
        fn leave_identifier(&mut self, _: Node<'_>, _: Ancestors<'_, '_>) -> HandlerResult<Option<EditDirective>> {
            self.renamed += 1;
            Ok(Some(EditDirective::literal("z")))
        }

        fn leave_call(&mut self, _: Node<'_>, _: Ancestors<'_, '_>) -> HandlerResult<Option<EditDirective>> {
            Err(Box::new(Refused))
        }
    }

    impl Visitor for FailOnCall {
        type Output = EditDirective;

        fn handlers(&self) -> Handlers<Self> {
            Handlers::new()
                .leave("identifier", Self::leave_identifier)
                .leave("call", Self::leave_call)
        }
    }

    let tree = parse("x = f(y)\n", "python").unwrap();
    let mut transformer = FailOnCall::default();
    let err = tree.transform(&mut transformer).unwrap_err();
    assert!(matches!(err, AstError::Handler(ref inner) if inner.is::<Refused>()));
    assert_eq!(transformer.renamed, 3);
}

#[test]
fn test_template_arity_is_checked_in_handler() {
    struct Broken;

    impl Broken {
        fn leave_integer(&mut self, node: Node<'_>, _: Ancestors<'_, '_>) -> HandlerResult<Option<EditDirective>> {
            Ok(Some(EditDirective::formatted("%s%s", [node])?))
        }
    }

    impl Visitor for Broken {
        type Output = EditDirective;

        fn handlers(&self) -> Handlers<Self> {
            Handlers::new().leave("integer", Self::leave_integer)
        }
    }

    let tree = parse("1\n", "python").unwrap();
    let err = tree.transform(&mut Broken).unwrap_err();
    let AstError::Handler(inner) = err else {
        unreachable!("arity errors raised in a handler are handler failures");
    };
    assert!(matches!(
        inner.downcast_ref::<AstError>(),
        Some(AstError::TemplateArity { placeholders: 2, slots: 1 })
    ));
}

#[test]
fn test_cycles_are_reported() {
    let tree = parse("x + y", "python").unwrap();
    let binary = tree.root().find_by_kind("binary_operator")[0];
    let left = binary.child(0).unwrap();

    let mut edits = EditMap::new();
    edits.insert(binary.id(), EditDirective::formatted("%s + 1", [binary]).unwrap());
    assert!(matches!(
        tree.reconcile(&edits),
        Err(AstError::Cycle { kind, .. }) if kind == "binary_operator"
    ));

    let mut edits = EditMap::new();
    let wrapped = FormattedReplacement::new("(%s)", [Slot::from(tree.root())]).unwrap();
    edits.insert(left.id(), wrapped.into());
    assert!(matches!(tree.reconcile(&edits), Err(AstError::Cycle { .. })));
}

#[test]
fn test_formatted_mixes_literal_and_node_slots() {
    let tree = parse("print(msg)\n", "python").unwrap();
    let call = tree.root().find_by_kind("call")[0];
    let argument = tree.root().find_by_kind("identifier")[1];
    let mut edits = EditMap::new();
    edits.insert(
        call.id(),
        EditDirective::formatted(
            "%s.write(%s + %s)",
            [Slot::literal("sys.stdout"), Slot::node(argument), Slot::literal("'\\n'")],
        )
        .unwrap(),
    );
    assert_eq!(tree.reconcile(&edits).unwrap(), "sys.stdout.write(msg + '\\n')\n");
}
