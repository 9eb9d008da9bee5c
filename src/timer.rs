use chrono::{DateTime, Duration, Local};

pub(crate) const TIMER_PHRASE: &str = "mob next";

pub(crate) fn parse_minutes(raw: &str) -> Result<u32, String> {
    raw.trim()
        .parse::<u32>()
        .map_err(|_| format!("timer needs a whole number of minutes (got {:?})", raw))
}

/// Shell line that waits, speaks the phrase, then tries a desktop notification.
pub(crate) fn timer_script(voice_command: &str, minutes: u32) -> String {
    let seconds = u64::from(minutes) * 60;
    format!(
        "( sleep {seconds} && {voice} \"{phrase}\" && \
(/usr/bin/osascript -e 'display notification \"{phrase}\"' || /usr/bin/notify-send \"{phrase}\") & )",
        seconds = seconds,
        voice = voice_command,
        phrase = TIMER_PHRASE
    )
}

pub(crate) fn finish_time(now: DateTime<Local>, minutes: u32) -> String {
    (now + Duration::minutes(i64::from(minutes)))
        .format("%H:%M")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn parse_minutes_accepts_whole_numbers() {
        assert_eq!(parse_minutes("10"), Ok(10));
        assert_eq!(parse_minutes(" 5 "), Ok(5));
        assert!(parse_minutes("ten").is_err());
        assert!(parse_minutes("-3").is_err());
    }

    #[test]
    fn script_sleeps_then_speaks() {
        let script = timer_script("say", 10);
        assert!(script.starts_with("( sleep 600 && say \"mob next\""), "got: {script}");
        assert!(script.contains("notify-send \"mob next\""), "got: {script}");
        assert!(script.ends_with("& )"), "got: {script}");
    }

    #[test]
    fn finish_time_wraps_past_midnight() {
        let now = Local
            .with_ymd_and_hms(2024, 3, 1, 23, 55, 0)
            .single()
            .expect("unambiguous time");
        assert_eq!(finish_time(now, 10), "00:05");
    }
}
