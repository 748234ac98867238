use winnow::ascii::digit0;
use winnow::combinator::{alt, cut_err, opt, preceded, repeat};
use winnow::error::{ErrMode, ModalResult, ParserError};
use winnow::prelude::*;
use winnow::token::one_of;

use crate::types::BoxError;

use super::error::LiteralError;

const NANOS_PER_SECOND: u128 = 1_000_000_000;

/// One `<number><unit>` element of a duration literal such as `1h30m`.
#[derive(Debug)]
struct Component<'i> {
    whole: &'i str,
    fraction: &'i str,
    unit: u128,
}

// -- Grammar ----------------------------------------------------------------

fn unit(input: &mut &str) -> ModalResult<u128> {
    alt((
        "ns".value(1_u128),
        "us".value(1_000),
        "\u{b5}s".value(1_000),
        "\u{3bc}s".value(1_000),
        "ms".value(1_000_000),
        "s".value(NANOS_PER_SECOND),
        "m".value(60 * NANOS_PER_SECOND),
        "h".value(3_600 * NANOS_PER_SECOND),
    ))
    .parse_next(input)
}

fn component<'i>(input: &mut &'i str) -> ModalResult<Component<'i>> {
    let whole = digit0.parse_next(input)?;
    let fraction = opt(preceded('.', digit0)).parse_next(input)?.unwrap_or("");
    if whole.is_empty() && fraction.is_empty() {
        return Err(ErrMode::from_input(input));
    }
    let unit = cut_err(unit).parse_next(input)?;
    Ok(Component {
        whole,
        fraction,
        unit,
    })
}

fn literal<'i>(input: &mut &'i str) -> ModalResult<(bool, Vec<Component<'i>>)> {
    let negative = opt(one_of(['-', '+']))
        .map(|sign| sign == Some('-'))
        .parse_next(input)?;
    let components: Vec<Component<'i>> = repeat(1.., component).parse_next(input)?;
    Ok((negative, components))
}

// -- Reduction --------------------------------------------------------------

#[allow(clippy::cast_possible_truncation)]
fn component_nanos(component: &Component<'_>) -> Option<u128> {
    let whole: u128 = if component.whole.is_empty() {
        0
    } else {
        component.whole.parse().ok()?
    };
    let mut nanos = whole.checked_mul(component.unit)?;
    // Digits past 18 are below one nanosecond for every unit.
    let fraction = &component.fraction[..component.fraction.len().min(18)];
    if !fraction.is_empty() {
        let value: u128 = fraction.parse().ok()?;
        let scale = 10_u128.pow(fraction.len() as u32);
        nanos = nanos.checked_add(value * component.unit / scale)?;
    }
    Some(nanos)
}

/// Default duration reducer: a signed chain of `<number><unit>` elements,
/// returned as nanoseconds.
///
/// Units are `ns`, `us` (or `µs`), `ms`, `s`, `m` and `h`; numbers may carry a
/// fraction (`1.5h`). A bare `0` needs no unit.
///
/// # Errors
///
/// Fails on a missing or unknown unit, trailing text, or overflow of `i64`.
pub fn parse_duration_nanos(text: &str) -> Result<i64, BoxError> {
    if matches!(text, "0" | "+0" | "-0") {
        return Ok(0);
    }
    let (negative, components) = literal
        .parse(text)
        .map_err(|_| LiteralError::new(format!("invalid duration '{text}'")))?;

    let out_of_range = || LiteralError::new(format!("duration '{text}' out of range"));
    let total = components
        .iter()
        .try_fold(0_u128, |acc, c| acc.checked_add(component_nanos(c)?))
        .ok_or_else(out_of_range)?;
    let magnitude = u64::try_from(total).map_err(|_| out_of_range())?;
    let nanos = if negative {
        0_i64.checked_sub_unsigned(magnitude)
    } else {
        i64::try_from(magnitude).ok()
    };
    Ok(nanos.ok_or_else(out_of_range)?)
}
