//! Тесты для каталога
