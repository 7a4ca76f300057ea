//! Тесты для планировщика грантов
