//! `sass:color` built-ins: a representative subset.

use codemap::Span;

use crate::args::CallArgs;
use crate::builtin::bind_positional;
use crate::color::Color;
use crate::error::{SassError, SassResult};
use crate::value::{Number, Value};

pub fn dispatch(name: &str, args: &CallArgs, span: Span) -> SassResult<Option<Value>> {
    let result = match name {
        "red" => channel(args, span, "red", Color::red)?,
        "green" => channel(args, span, "green", Color::green)?,
        "blue" => channel(args, span, "blue", Color::blue)?,
        "alpha" | "opacity" => {
            let [c] = bind_positional(name, args, &[("color", None)])?.try_into().unwrap();
            Value::Number(Number::unitless(as_color(c, span)?.alpha()))
        }
        "mix" => {
            let [c1, c2, weight] = bind_positional(
                "mix",
                args,
                &[("color1", None), ("color2", None), ("weight", Some(Value::Number(Number::with_unit(50.0, "%"))))],
            )?
            .try_into()
            .unwrap();
            mix(as_color(c1, span)?, as_color(c2, span)?, weight, span)?
        }
        "grayscale" => {
            let [c] = bind_positional("grayscale", args, &[("color", None)])?.try_into().unwrap();
            let color = as_color(c, span)?;
            let (h, _, l, a) = color.to_hsla();
            Value::Color(Color::from_hsla(h, 0.0, l, a))
        }
        "invert" => {
            let [c, weight] = bind_positional(
                "invert",
                args,
                &[("color", None), ("weight", Some(Value::Number(Number::with_unit(100.0, "%"))))],
            )?
            .try_into()
            .unwrap();
            let color = as_color(c, span)?;
            let inverted = Color::new(255 - color.red(), 255 - color.green(), 255 - color.blue(), color.alpha());
            mix(inverted, color, weight, span)?
        }
        "lighten" => adjust_lightness(args, span, "lighten", 1.0)?,
        "darken" => adjust_lightness(args, span, "darken", -1.0)?,
        "saturate" => adjust_saturation(args, span, "saturate", 1.0)?,
        "desaturate" => adjust_saturation(args, span, "desaturate", -1.0)?,
        "rgba" => {
            let [c, alpha] = bind_positional("rgba", args, &[("color", None), ("alpha", None)])?.try_into().unwrap();
            Value::Color(as_color(c, span)?.with_alpha(alpha.as_number()?.value()))
        }
        "complement" => {
            let [c] = bind_positional("complement", args, &[("color", None)])?.try_into().unwrap();
            let color = as_color(c, span)?;
            let (h, s, l, a) = color.to_hsla();
            Value::Color(Color::from_hsla(h + 180.0, s, l, a))
        }
        _ => return Ok(None),
    };
    Ok(Some(result))
}

fn as_color(value: Value, span: Span) -> SassResult<Color> {
    match value {
        Value::Color(c) => Ok(c),
        other => Err(SassError::runtime(format!("{} is not a color.", other.to_css_string(span)?), span)),
    }
}

fn channel(args: &CallArgs, span: Span, name: &'static str, f: impl Fn(&Color) -> u8) -> SassResult<Value> {
    let [c] = bind_positional(name, args, &[("color", None)])?.try_into().unwrap();
    Ok(Value::Number(Number::unitless(f64::from(f(&as_color(c, span)?)))))
}

fn percentage_to_unit(value: &Value, span: Span) -> SassResult<f64> {
    let n = value.as_number()?;
    if n.has_unit("%") {
        Ok(n.value() / 100.0)
    } else {
        Err(SassError::runtime(format!("{} must be a percentage.", n), span))
    }
}

fn mix(c1: Color, c2: Color, weight: Value, span: Span) -> SassResult<Value> {
    let w = percentage_to_unit(&weight, span)?.clamp(0.0, 1.0);
    let alpha_distance = c1.alpha() - c2.alpha();
    let weight1 = if alpha_distance == 0.0 {
        w
    } else {
        let adjusted = w * 2.0 - 1.0;
        let combined = adjusted * alpha_distance;
        ((if combined == -1.0 { adjusted } else { (adjusted + alpha_distance) / (1.0 + combined) }) + 1.0) / 2.0
    };
    let weight2 = 1.0 - weight1;
    let mix_channel = |a: u8, b: u8| -> u8 { (f64::from(a) * weight1 + f64::from(b) * weight2).round() as u8 };
    Ok(Value::Color(Color::new(
        mix_channel(c1.red(), c2.red()),
        mix_channel(c1.green(), c2.green()),
        mix_channel(c1.blue(), c2.blue()),
        c1.alpha() * w + c2.alpha() * (1.0 - w),
    )))
}

fn adjust_lightness(args: &CallArgs, span: Span, name: &'static str, sign: f64) -> SassResult<Value> {
    let [c, amount] = bind_positional(name, args, &[("color", None), ("amount", None)])?.try_into().unwrap();
    let color = as_color(c, span)?;
    let delta = percentage_to_unit(&amount, span)? * 100.0 * sign;
    let (h, s, l, a) = color.to_hsla();
    Ok(Value::Color(Color::from_hsla(h, s, (l + delta).clamp(0.0, 100.0), a)))
}

fn adjust_saturation(args: &CallArgs, span: Span, name: &'static str, sign: f64) -> SassResult<Value> {
    let [c, amount] = bind_positional(name, args, &[("color", None), ("amount", None)])?.try_into().unwrap();
    let color = as_color(c, span)?;
    let delta = percentage_to_unit(&amount, span)? * 100.0 * sign;
    let (h, s, l, a) = color.to_hsla();
    Ok(Value::Color(Color::from_hsla(h, (s + delta).clamp(0.0, 100.0), l, a)))
}
