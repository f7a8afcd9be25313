use meditation_core::session::{format_clock, script, Effect, Timeline};

fn describe(effect: &Effect) -> String {
    match effect {
        Effect::EnterPhase(phase) => format!("enter    {}", phase.title()),
        Effect::LightLine(id) => format!(
            "line     {}",
            script::line_text(id).unwrap_or(id.as_str())
        ),
        Effect::ClearLine => "clear".to_string(),
        Effect::SetBreathGuide(on) => {
            format!("breath   {}", if *on { "on" } else { "off" })
        }
        Effect::BeginCooling => "cooling".to_string(),
        Effect::ShowAffirmation => "affirm   (affirmation card)".to_string(),
        Effect::PlayTrack(key) => format!("audio    {key}"),
        Effect::StopAudio => "audio    stop".to_string(),
    }
}

pub fn run(json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let timeline = Timeline::build();
    timeline.validate()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&timeline)?);
        return Ok(());
    }

    for entry in timeline.entries() {
        println!("{:>5}  {}", format_clock(entry.offset_secs), describe(&entry.effect));
    }
    Ok(())
}
