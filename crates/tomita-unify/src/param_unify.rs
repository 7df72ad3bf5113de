use std::rc::Rc;

use tomita_runtime::{FeatureCheck, FeatureMap, FeatureValue, FParam, ParamKind, TomitaError, TomitaResult};

fn value_label(v: &FeatureValue) -> String {
    match v {
        FeatureValue::Literal(s) => s.clone(),
        FeatureValue::Bool(b) => b.to_string(),
        FeatureValue::Required(s) => format!("?{s}"),
        FeatureValue::Forbidden(s) => format!("!{s}"),
        FeatureValue::Optional(s) => format!("~{s}"),
        FeatureValue::Reference(s) => format!("*{s}"),
        FeatureValue::ChildRef(i) => format!("${i}"),
        FeatureValue::Subtree(ids) => format!("<{}-subtree>", ids.len()),
    }
}

/// Upward unification (C5): unifies `src` — a child subtree's feature
/// map — into `dst` — the accumulating rule-level feature map — filtered
/// through `param`, the child occurrence's `FParam`. Mirrors
/// `parser.py: unify_up` line for line.
///
/// `?!` directives (`Required`/`Forbidden`/`Optional`) are never
/// specially evaluated here — only the separate checklist mechanism
/// asserts those ("currently ?! is ignored in Up Propagation").
pub fn unify_up(dst: &FeatureMap, param: Option<&FParam>, src: &FeatureMap) -> TomitaResult<FeatureMap> {
    let (check_keys, copy_keys): (Vec<(Rc<str>, &FeatureValue)>, Vec<(Rc<str>, Rc<str>)>) = match param {
        None => (Vec::new(), src.keys().map(|k| (k.clone(), k.clone())).collect()),
        Some(p) => {
            let checks = p
                .features
                .iter()
                .filter(|(k, v)| v.is_concrete() && src.contains_key(k.as_ref()))
                .map(|(k, v)| (k.clone(), v))
                .collect();

            let copies = if p.kind == ParamKind::WithoutMinus {
                src.keys()
                    .filter(|k| !p.features.contains_key(k.as_ref()))
                    .map(|k| (k.clone(), k.clone()))
                    .collect()
            } else {
                let mut copies: Vec<(Rc<str>, Rc<str>)> = p
                    .features
                    .iter()
                    .filter_map(|(k, v)| match v {
                        FeatureValue::Reference(name) if src.contains_key(k.as_ref()) => {
                            Some((k.clone(), Rc::from(name.as_str())))
                        }
                        _ => None,
                    })
                    .collect();
                if p.kind == ParamKind::WithPlus {
                    copies.extend(
                        src.keys()
                            .filter(|k| !p.features.contains_key(k.as_ref()))
                            .map(|k| (k.clone(), k.clone())),
                    );
                }
                copies
            };
            (checks, copies)
        }
    };

    for (key, expected) in &check_keys {
        let src_val = &src[key];
        if src_val != *expected {
            return Err(TomitaError::unify(
                key.to_string(),
                value_label(src_val),
                value_label(expected),
                Vec::new(),
            ));
        }
    }

    let mut new_items = FeatureMap::new();
    for (src_key, dst_key) in &copy_keys {
        let src_val = &src[src_key];
        match dst.get(dst_key.as_ref()) {
            None => {
                new_items.insert(dst_key.clone(), src_val.clone());
            }
            Some(dst_val) if dst_val != src_val => {
                return Err(TomitaError::unify(
                    dst_key.to_string(),
                    value_label(src_val),
                    value_label(dst_val),
                    Vec::new(),
                ));
            }
            Some(_) => {}
        }
    }

    if new_items.is_empty() {
        Ok(dst.clone())
    } else {
        let mut merged = dst.clone();
        merged.extend(new_items);
        Ok(merged)
    }
}

/// Downward unification (C6): unifies rule-level features `src` (the
/// ambient feature map flowing down from the caller) into `dst` (the
/// candidate rule's own feature map) filtered through `param`, then
/// applies `checklist` assertions against the merged result. Mirrors
/// `parser.py: unify_down`.
pub fn unify_down(
    dst: &FeatureMap,
    param: Option<&FParam>,
    src: &FeatureMap,
    checklist: &[(Rc<str>, FeatureCheck)],
) -> TomitaResult<FeatureMap> {
    let pdict: FeatureMap = match param {
        None => src.clone(),
        Some(p) => {
            let mut pdict = FeatureMap::new();
            for (key, val) in &p.features {
                match val {
                    FeatureValue::Reference(name) => {
                        if let Some(v) = src.get(name.as_str()) {
                            pdict.insert(key.clone(), v.clone());
                        }
                    }
                    _ if val.is_concrete() => {
                        pdict.insert(key.clone(), val.clone());
                    }
                    _ => {
                        if let Some(v) = src.get(key.as_ref()) {
                            pdict.insert(key.clone(), v.clone());
                        }
                    }
                }
            }
            pdict
        }
    };

    for (key, val) in &pdict {
        if let Some(dst_val) = dst.get(key.as_ref()) {
            if dst_val != val {
                return Err(TomitaError::unify(key.to_string(), value_label(val), value_label(dst_val), Vec::new()));
            }
        }
    }

    let mut merged = dst.clone();
    for (key, val) in &pdict {
        if !merged.contains_key(key.as_ref()) {
            merged.insert(key.clone(), val.clone());
        }
    }

    for (key, check) in checklist {
        match check {
            FeatureCheck::Exists => {
                if !merged.contains_key(key.as_ref()) {
                    return Err(TomitaError::unify(key.to_string(), "<missing>", "exists", Vec::new()));
                }
            }
            FeatureCheck::Absent => {
                if merged.contains_key(key.as_ref()) {
                    return Err(TomitaError::unify(key.to_string(), value_label(&merged[key.as_ref()]), "absent", Vec::new()));
                }
            }
            FeatureCheck::Equals(expected) => match merged.get(key.as_ref()) {
                Some(v) if value_label(v) == *expected => {}
                other => {
                    let got = other.map(value_label).unwrap_or_else(|| "<missing>".to_string());
                    return Err(TomitaError::unify(key.to_string(), got, expected.clone(), Vec::new()));
                }
            },
            FeatureCheck::NotEquals(forbidden) => {
                if let Some(v) = merged.get(key.as_ref()) {
                    if value_label(v) == *forbidden {
                        return Err(TomitaError::unify(key.to_string(), value_label(v), format!("!= {forbidden}"), Vec::new()));
                    }
                }
            }
        }
    }

    Ok(merged)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit(s: &str) -> FeatureValue {
        FeatureValue::Literal(s.to_string())
    }

    #[test]
    fn unify_up_with_no_param_copies_everything() {
        let mut src = FeatureMap::new();
        src.insert(Rc::from("numb"), lit("sing"));
        let dst = FeatureMap::new();
        let merged = unify_up(&dst, None, &src).unwrap();
        assert_eq!(merged.get("numb"), Some(&lit("sing")));
    }

    #[test]
    fn unify_up_rejects_conflicting_values() {
        let mut src = FeatureMap::new();
        src.insert(Rc::from("numb"), lit("plur"));
        let mut dst = FeatureMap::new();
        dst.insert(Rc::from("numb"), lit("sing"));
        assert!(unify_up(&dst, None, &src).is_err());
    }

    #[test]
    fn unify_up_only_copies_referenced_entries() {
        let mut src = FeatureMap::new();
        src.insert(Rc::from("numb"), lit("sing"));
        src.insert(Rc::from("case"), lit("nom"));
        let mut features = FeatureMap::new();
        features.insert(Rc::from("numb"), FeatureValue::Reference("numb".to_string()));
        let param = FParam::new(features, ParamKind::Only);
        let dst = FeatureMap::new();
        let merged = unify_up(&dst, Some(&param), &src).unwrap();
        assert_eq!(merged.get("numb"), Some(&lit("sing")));
        assert!(!merged.contains_key("case"));
    }

    #[test]
    fn unify_up_with_plus_also_copies_unmentioned_keys() {
        let mut src = FeatureMap::new();
        src.insert(Rc::from("numb"), lit("sing"));
        src.insert(Rc::from("case"), lit("nom"));
        let mut features = FeatureMap::new();
        features.insert(Rc::from("numb"), FeatureValue::Reference("numb".to_string()));
        let param = FParam::new(features, ParamKind::WithPlus);
        let dst = FeatureMap::new();
        let merged = unify_up(&dst, Some(&param), &src).unwrap();
        assert_eq!(merged.get("case"), Some(&lit("nom")));
    }

    #[test]
    fn unify_down_merges_new_keys_and_checks_existing() {
        let mut dst = FeatureMap::new();
        dst.insert(Rc::from("numb"), lit("sing"));
        let mut src = FeatureMap::new();
        src.insert(Rc::from("case"), lit("nom"));
        let merged = unify_down(&dst, None, &src, &[]).unwrap();
        assert_eq!(merged.get("case"), Some(&lit("nom")));
        assert_eq!(merged.get("numb"), Some(&lit("sing")));
    }

    #[test]
    fn unify_down_checklist_enforces_existence() {
        let dst = FeatureMap::new();
        let src = FeatureMap::new();
        let checklist = vec![(Rc::from("numb"), FeatureCheck::Exists)];
        assert!(unify_down(&dst, None, &src, &checklist).is_err());
    }
}
