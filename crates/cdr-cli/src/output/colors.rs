//! ANSI color helpers for terminal output

use colored::Colorize;

/// Get colored header
pub fn header(text: &str) -> String {
    text.bold().underline().to_string()
}

/// Get colored label
pub fn label(text: &str) -> String {
    text.white().dimmed().to_string()
}

/// Get colored value
pub fn value(text: &str) -> String {
    text.white().bold().to_string()
}

/// Get colored record id
pub fn colored_id(id: i64) -> String {
    format!("#{:<6}", id).white().dimmed().to_string()
}

/// Get colored timestamp
pub fn colored_time(timestamp: &str) -> String {
    timestamp.white().dimmed().to_string()
}

/// Get colored phone number
pub fn colored_number(number: &str) -> String {
    number.cyan().to_string()
}

/// Get colored transfer target
pub fn colored_transfer(number: &str) -> String {
    number.magenta().to_string()
}

/// Get colored audio marker
pub fn audio_marker(has_audio: bool) -> String {
    if has_audio {
        "♪".green().to_string()
    } else {
        " ".to_string()
    }
}

pub fn success(text: &str) -> String {
    format!("{} {}", "✓".green(), text)
}

pub fn warning(text: &str) -> String {
    format!("{} {}", "!".yellow(), text)
}

pub fn error(text: &str) -> String {
    format!("{} {}", "✗".red(), text)
}

/// Format seconds as a short duration (1h02m03s, 4m05s, 9s)
pub fn format_duration(seconds: i64) -> String {
    let seconds = seconds.max(0);
    let (h, m, s) = (seconds / 3600, (seconds % 3600) / 60, seconds % 60);
    if h > 0 {
        format!("{}h{:02}m{:02}s", h, m, s)
    } else if m > 0 {
        format!("{}m{:02}s", m, s)
    } else {
        format!("{}s", s)
    }
}

/// Format size in human-readable form
pub fn format_size(bytes: u64) -> String {
    let bytes = bytes as f64;
    if bytes < 1024.0 {
        format!("{:.0} B", bytes)
    } else if bytes < 1024.0 * 1024.0 {
        format!("{:.1} KB", bytes / 1024.0)
    } else if bytes < 1024.0 * 1024.0 * 1024.0 {
        format!("{:.1} MB", bytes / (1024.0 * 1024.0))
    } else {
        format!("{:.1} GB", bytes / (1024.0 * 1024.0 * 1024.0))
    }
}

/// Format count with comma separators
pub fn format_count(n: i64) -> String {
    let s = n.to_string();
    let (sign, digits) = match s.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", s.as_str()),
    };
    let chars: Vec<char> = digits.chars().collect();
    let mut result = String::from(sign);

    for (i, c) in chars.iter().enumerate() {
        if i > 0 && (chars.len() - i) % 3 == 0 {
            result.push(',');
        }
        result.push(*c);
    }

    result
}
