//! Тесты для модели грантов
