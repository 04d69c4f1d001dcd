//! Integer arithmetic for the Calculate action

use nom::character::complete::{digit1, one_of, space0};
use nom::combinator::{all_consuming, map_res};
use nom::sequence::delimited;
use nom::{IResult, Parser};

use crate::actions::handler::{ActionArgs, ActionHandler, HandlerOutput};
use crate::command::action::{Expression, Operator};
use crate::core::error::{InterpreterError, Result};
use crate::core::types::ActionKind;

/// Evaluates `"<int> <op> <int>"` expressions
#[derive(Debug, Clone, Copy, Default)]
pub struct CalculatorHandler;

impl ActionHandler for CalculatorHandler {
    fn handle(&self, kind: ActionKind, args: &ActionArgs) -> Result<HandlerOutput> {
        let text = args.require(kind, "expression")?;
        let expression = parse_expression(text)?;
        let value = evaluate(&expression)?;
        Ok(HandlerOutput::message(format!("{} = {}", expression, value)))
    }
}

fn operand(input: &str) -> IResult<&str, i64> {
    map_res(delimited(space0, digit1, space0), |digits: &str| {
        digits.parse::<i64>()
    })
    .parse(input)
}

fn operator(input: &str) -> IResult<&str, char> {
    one_of("+-*/").parse(input)
}

pub fn parse_expression(text: &str) -> Result<Expression> {
    let (_, (lhs, symbol, rhs)) = all_consuming((operand, operator, operand))
        .parse(text.trim())
        .map_err(|_| InterpreterError::handler(format!("Cannot evaluate '{}'", text)))?;

    let op = Operator::from_symbol(symbol)
        .ok_or_else(|| InterpreterError::handler(format!("Unknown operator '{}'", symbol)))?;

    Ok(Expression { lhs, op, rhs })
}

/// Evaluate with overflow checks; inexact division is shown with up to 4 decimals
pub fn evaluate(expression: &Expression) -> Result<String> {
    let Expression { lhs, op, rhs } = *expression;
    let overflow = || InterpreterError::handler(format!("{} is too large", expression));

    let value = match op {
        Operator::Add => lhs.checked_add(rhs).ok_or_else(overflow)?,
        Operator::Subtract => lhs.checked_sub(rhs).ok_or_else(overflow)?,
        Operator::Multiply => lhs.checked_mul(rhs).ok_or_else(overflow)?,
        Operator::Divide => {
            if rhs == 0 {
                return Err(InterpreterError::handler("Cannot divide by zero"));
            }
            if lhs % rhs != 0 {
                let quotient = lhs as f64 / rhs as f64;
                let formatted = format!("{:.4}", quotient);
                return Ok(formatted
                    .trim_end_matches('0')
                    .trim_end_matches('.')
                    .to_string());
            }
            lhs.checked_div(rhs).ok_or_else(overflow)?
        }
    };

    Ok(value.to_string())
}
