//! `sass:map` built-ins: a representative subset.

use codemap::Span;

use crate::args::CallArgs;
use crate::builtin::bind_positional;
use crate::error::{SassError, SassResult};
use crate::value::{SassMap, Value};

pub fn dispatch(name: &str, args: &CallArgs, span: Span) -> SassResult<Option<Value>> {
    let result = match name {
        "map-get" => {
            let [map, key] = bind_positional("map-get", args, &[("map", None), ("key", None)])?.try_into().unwrap();
            map.as_map()?.get(&key).cloned().unwrap_or(Value::Null)
        }
        "map-has-key" => {
            let [map, key] = bind_positional("map-has-key", args, &[("map", None), ("key", None)])?.try_into().unwrap();
            Value::Bool(map.as_map()?.get(&key).is_some())
        }
        "map-keys" => {
            let [map] = bind_positional("map-keys", args, &[("map", None)])?.try_into().unwrap();
            Value::List(map.as_map()?.keys(), crate::common::ListSeparator::Comma, crate::common::Brackets::None)
        }
        "map-values" => {
            let [map] = bind_positional("map-values", args, &[("map", None)])?.try_into().unwrap();
            Value::List(map.as_map()?.values(), crate::common::ListSeparator::Comma, crate::common::Brackets::None)
        }
        "map-remove" => {
            let map = args.positional.first().cloned().ok_or_else(|| SassError::runtime("Missing argument $map.", span))?;
            let mut result = map.as_map()?.clone();
            for key in args.positional.iter().skip(1) {
                result.remove(key);
            }
            for (_, key) in &args.named {
                result.remove(key);
            }
            Value::Map(result)
        }
        "map-merge" => {
            let map1 = args.positional.first().cloned().ok_or_else(|| SassError::runtime("Missing argument $map1.", span))?;
            let map2 = args.positional.get(1).cloned().ok_or_else(|| SassError::runtime("Missing argument $map2.", span))?;
            let mut merged = map1.as_map()?.clone();
            merged.merge(map2.as_map()?.clone());
            Value::Map(merged)
        }
        "map-deep-merge" => {
            let map1 = args.positional.first().cloned().ok_or_else(|| SassError::runtime("Missing argument $map1.", span))?;
            let map2 = args.positional.get(1).cloned().ok_or_else(|| SassError::runtime("Missing argument $map2.", span))?;
            Value::Map(deep_merge(map1.as_map()?, map2.as_map()?))
        }
        _ => return Ok(None),
    };
    Ok(Some(result))
}

fn deep_merge(a: &SassMap, b: &SassMap) -> SassMap {
    let mut result = a.clone();
    for (key, value) in b.iter() {
        match (result.get(key), value) {
            (Some(Value::Map(existing)), Value::Map(incoming)) => {
                let nested = deep_merge(existing, incoming);
                result.insert(key.clone(), Value::Map(nested));
            }
            _ => {
                result.insert(key.clone(), value.clone());
            }
        }
    }
    result
}
