use kc_core::profile::ProfileSet;

pub fn list(profiles: &ProfileSet) {
    println!("{:<6} {:<12} {:<9} {:>5}  icon", "code", "name", "script", "rules");
    for p in profiles.iter() {
        println!(
            "{:<6} {:<12} {:<9} {:>5}  {}",
            p.code(),
            p.name(),
            p.script().as_str(),
            p.table().rules().len(),
            p.icon().unwrap_or("-")
        );
    }
}

/// Print every rule of one profile with its sequence shape.
pub fn rules(profiles: &ProfileSet, code: &str) {
    let profile = die!(
        profiles.get(code).ok_or("unknown profile"),
        "Error: {code}: {}"
    );
    if profile.is_pass_through() {
        println!("{code}: pass-through (every key renders as itself)");
        return;
    }
    for rule in profile.table().rules() {
        let upper = rule.upper.map_or_else(|| "-".to_string(), String::from);
        println!(
            "{:<6} {} {}  {}",
            rule.sequence_string(),
            upper,
            rule.lower,
            rule.kind.as_str()
        );
    }
}
