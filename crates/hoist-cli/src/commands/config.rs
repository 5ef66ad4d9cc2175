use hoist_dispatch::DispatchConfig;

pub fn run() -> Result<(), String> {
    let json = serde_json::to_string_pretty(&DispatchConfig::default())
        .map_err(|e| format!("cannot serialize config: {e}"))?;
    println!("{json}");
    Ok(())
}
