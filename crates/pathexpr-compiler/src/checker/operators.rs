//! Operators, casts and sequences.

use pathexpr_ast::NodeId;
use pathexpr_core::{
    ArithmeticOp, BitwiseOp, LogicalOp, RelationalOp, ShiftOp, TypeInfo, TypeProvider,
};

use super::TypeChecker;
use crate::CheckError;

fn unary(c: &mut TypeChecker<'_>, id: NodeId) -> Option<TypeInfo> {
    let operand = c.required_child(id, 0);
    c.visit(operand)
}

fn binary(c: &mut TypeChecker<'_>, id: NodeId) -> (Option<TypeInfo>, Option<TypeInfo>) {
    let left = c.required_child(id, 0);
    let right = c.required_child(id, 1);
    (c.visit(left), c.visit(right))
}

/// Usable where a boolean is required.
fn is_boolean_like(provider: &dyn TypeProvider, t: &TypeInfo) -> bool {
    t.is_boolean() || t.is_null() || t.is_any() || provider.is_compatible(t, &TypeInfo::boolean())
}

fn incompatible(c: &mut TypeChecker<'_>, id: NodeId, operator: &str, detail: String) {
    c.error(CheckError::OperandsNotCompatible {
        operator: operator.to_string(),
        detail,
        span: c.span(id),
    });
}

// ============================================================================
// Logical and relational
// ============================================================================

pub(super) fn check_logical(c: &mut TypeChecker<'_>, id: NodeId, op: LogicalOp) -> Option<TypeInfo> {
    let types = c.visit_children(id);
    let provider = c.provider();
    let offending = types
        .iter()
        .flatten()
        .find(|t| !is_boolean_like(provider, t))
        .cloned();
    if let Some(t) = offending {
        incompatible(c, id, &op.to_string(), format!("'{t}' is not boolean"));
    }
    Some(TypeInfo::boolean())
}

pub(super) fn check_relational(c: &mut TypeChecker<'_>, id: NodeId, op: RelationalOp) -> Option<TypeInfo> {
    let (left, right) = binary(c, id);
    if let (Some(l), Some(r)) = (&left, &right)
        && !l.is_null()
        && !r.is_null()
        && !c.provider().is_compatible_either(l, r)
    {
        incompatible(c, id, &op.to_string(), format!("'{l}' and '{r}'"));
    }
    Some(TypeInfo::boolean())
}

// ============================================================================
// Arithmetic
// ============================================================================

pub(super) fn check_arithmetic(c: &mut TypeChecker<'_>, id: NodeId, op: ArithmeticOp) -> Option<TypeInfo> {
    let (left, right) = binary(c, id);
    numeric_result(c, id, op, left.as_ref(), right.as_ref(), op == ArithmeticOp::Add)
}

/// Result type of `left op right`.
///
/// Primitive operands widen; a null operand adopts the other side; other
/// types go through the arithmetic registry. With `concat`, an unresolvable
/// pair falls back to string concatenation instead of an error.
pub(super) fn numeric_result(
    c: &mut TypeChecker<'_>,
    id: NodeId,
    op: ArithmeticOp,
    left: Option<&TypeInfo>,
    right: Option<&TypeInfo>,
    concat: bool,
) -> Option<TypeInfo> {
    let (left, right) = (left?, right?);

    if left.is_null() && right.is_null() {
        return Some(TypeInfo::null());
    }
    if left.is_null() || right.is_null() {
        let other = if left.is_null() { right } else { left };
        if op == ArithmeticOp::Div
            && !other.is_numeric()
            && !c.env.arithmetic().supports_division(other)
        {
            c.error(CheckError::DivisionNotSupported {
                operand: other.to_string(),
                span: c.span(id),
            });
            return None;
        }
        return Some(other.clone());
    }

    if let (Some(a), Some(b)) = (left.primitive_kind(), right.primitive_kind())
        && let Some(wider) = a.wider(b)
    {
        return Some(TypeInfo::primitive(wider));
    }
    if left.hash() == right.hash() && left.is_numeric() {
        return Some(left.clone());
    }
    if let Some(result) = c.env.arithmetic().result_type(op, left, right) {
        return Some(result.clone());
    }
    if concat {
        return Some(TypeInfo::string());
    }
    if c.typed() {
        c.error(CheckError::ArithmeticUnresolved {
            operator: op.to_string(),
            left: left.to_string(),
            right: right.to_string(),
            span: c.span(id),
        });
    }
    None
}

pub(super) fn check_negate(c: &mut TypeChecker<'_>, id: NodeId) -> Option<TypeInfo> {
    let operand = unary(c, id)?;
    if operand.is_numeric() || operand.is_null() {
        return Some(operand);
    }
    incompatible(c, id, "-", format!("'{operand}' is not numeric"));
    None
}

// ============================================================================
// Bitwise
// ============================================================================

pub(super) fn check_bit_not(c: &mut TypeChecker<'_>, id: NodeId) -> Option<TypeInfo> {
    let operand = unary(c, id)?;
    if operand.is_integral() || operand.is_null() {
        return Some(operand);
    }
    incompatible(c, id, "~", format!("'{operand}' is not an integer"));
    None
}

pub(super) fn check_bitwise(c: &mut TypeChecker<'_>, id: NodeId, op: BitwiseOp) -> Option<TypeInfo> {
    let (left, right) = binary(c, id);
    let (left, right) = (left?, right?);
    if left.is_boolean() && right.is_boolean() {
        return Some(TypeInfo::boolean());
    }
    if !integral_operands(c, id, &op.to_string(), &left, &right) {
        return None;
    }
    if left.is_null() {
        return Some(right);
    }
    if right.is_null() {
        return Some(left);
    }
    match (left.primitive_kind(), right.primitive_kind()) {
        (Some(a), Some(b)) => a.wider(b).map(TypeInfo::primitive),
        _ => Some(left),
    }
}

pub(super) fn check_shift(c: &mut TypeChecker<'_>, id: NodeId, op: ShiftOp) -> Option<TypeInfo> {
    let (left, right) = binary(c, id);
    let (left, right) = (left?, right?);
    if !integral_operands(c, id, &op.to_string(), &left, &right) {
        return None;
    }
    Some(left)
}

fn integral_operands(
    c: &mut TypeChecker<'_>,
    id: NodeId,
    operator: &str,
    left: &TypeInfo,
    right: &TypeInfo,
) -> bool {
    match [left, right]
        .into_iter()
        .find(|t| !t.is_integral() && !t.is_null())
    {
        Some(t) => {
            incompatible(c, id, operator, format!("'{t}' is not an integer"));
            false
        }
        None => true,
    }
}

// ============================================================================
// Conditional
// ============================================================================

pub(super) fn check_conditional(c: &mut TypeChecker<'_>, id: NodeId) -> Option<TypeInfo> {
    let condition = c.required_child(id, 0);
    let then = c.required_child(id, 1);
    let otherwise = c.required_child(id, 2);

    let condition_type = c.visit(condition);
    let branches = [c.visit(then), c.visit(otherwise)];
    let provider = c.provider();

    if let Some(found) = &condition_type
        && !is_boolean_like(provider, found)
    {
        c.error(CheckError::ConditionNotBoolean {
            found: found.to_string(),
            span: c.span(condition),
        });
    }

    if let [Some(a), Some(b)] = &branches
        && !a.is_null()
        && !b.is_null()
        && !provider.is_compatible_either(a, b)
    {
        incompatible(c, id, "?:", format!("'{a}' and '{b}'"));
    }

    if let Some(t) = branches.iter().flatten().find(|t| !t.is_null()) {
        return Some(t.clone());
    }
    if branches.iter().flatten().next().is_some() {
        return Some(TypeInfo::null());
    }
    if c.typed() {
        c.error(CheckError::UnresolvedExpression {
            what: "conditional".to_string(),
            span: c.span(id),
        });
    }
    None
}

// ============================================================================
// Casts and type tests
// ============================================================================

/// `(Type) operand`. The node takes the target type even when the cast is invalid.
pub(super) fn check_cast(c: &mut TypeChecker<'_>, id: NodeId, type_name: &str) -> Option<TypeInfo> {
    let operand = unary(c, id);
    let Some(target) = c.provider().type_info(type_name) else {
        c.error(CheckError::UnknownType {
            name: type_name.to_string(),
            span: c.span(id),
        });
        return None;
    };
    if let Some(from) = &operand
        && !from.is_null()
        && !c.provider().is_castable(from, &target)
    {
        c.error(CheckError::InvalidCast {
            from: from.to_string(),
            to: target.to_string(),
            span: c.span(id),
        });
    }
    Some(target)
}

/// Always boolean; only the type name is checked.
pub(super) fn check_instance_of(c: &mut TypeChecker<'_>, id: NodeId, type_name: &str) -> Option<TypeInfo> {
    unary(c, id);
    c.resolve_type_name(id, type_name);
    Some(TypeInfo::boolean())
}

/// `in` and `not in`.
pub(super) fn check_membership(c: &mut TypeChecker<'_>, id: NodeId) -> Option<TypeInfo> {
    c.visit_children(id);
    Some(TypeInfo::boolean())
}

pub(super) fn check_sequence(c: &mut TypeChecker<'_>, id: NodeId) -> Option<TypeInfo> {
    let last = c.visit_children(id).pop().flatten();
    if last.is_none() && c.typed() {
        c.error(CheckError::UnresolvedExpression {
            what: "sequence".to_string(),
            span: c.span(id),
        });
    }
    last
}
