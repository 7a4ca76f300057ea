//! Утилиты для grantplan

use std::fmt::Write;

/// Приводит ключевое слово из замкнутого набора к виду `[a-z0-9_]`
///
/// Преобразование необратимо и годится только для значений, которые
/// различаются после приведения (привилегии, виды объектов).
pub fn slugify(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect()
}

/// Обратимо кодирует пользовательское имя в часть идентификатора гранта
///
/// `A-Z` и цифры записываются как `a-z` и цифры. Одиночный `_` внутри имени
/// остается как есть. Остальные байты UTF-8 (включая строчные буквы) и `_`
/// на краях или перед другим `_` записываются как `-hh`. Результат не
/// содержит `__` и не начинается и не заканчивается на `_`, поэтому
/// разделитель частей однозначен. Пустое имя кодируется как `-`.
pub fn encode_id_segment(name: &str) -> String {
    if name.is_empty() {
        return "-".to_string();
    }

    let bytes = name.as_bytes();
    let mut encoded = String::with_capacity(bytes.len());
    for (position, &byte) in bytes.iter().enumerate() {
        match byte {
            b'A'..=b'Z' => encoded.push(byte.to_ascii_lowercase() as char),
            b'0'..=b'9' => encoded.push(byte as char),
            b'_' if position > 0
                && position + 1 < bytes.len()
                && bytes[position + 1] != b'_' =>
            {
                encoded.push('_')
            }
            _ => {
                let _ = write!(encoded, "-{:02x}", byte);
            }
        }
    }
    encoded
}

/// Проверяет, является ли имя объекта каталога валидным
pub fn is_valid_object_name(name: &str) -> bool {
    !name.trim().is_empty() && !name.chars().any(|c| c.is_control())
}

/// Путь объекта в виде `A.B.C`
pub fn qualified_name(parts: &[&str]) -> String {
    parts.join(".")
}
