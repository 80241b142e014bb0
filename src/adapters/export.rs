use crate::domain::model::Menu;
use crate::utils::error::Result;
use chrono::NaiveDate;
use serde::Serialize;
use std::io::Write;

#[derive(Debug, Serialize)]
struct MealRow<'a> {
    date: NaiveDate,
    name: &'a str,
    price_in_cent: u32,
    price: String,
}

/// Writes one row per meal of every menu, in log order, with a header line.
pub fn write_meal_table<W: Write>(menus: &[Menu], writer: W) -> Result<usize> {
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(true)
        .from_writer(writer);

    let mut rows = 0;
    for menu in menus {
        for meal in menu.meals() {
            csv_writer.serialize(MealRow {
                date: menu.date(),
                name: meal.name(),
                price_in_cent: meal.price_in_cent(),
                price: meal.price_in_euros(),
            })?;
            rows += 1;
        }
    }

    csv_writer.flush()?;
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::Meal;

    #[test]
    fn test_write_meal_table() {
        let menus = vec![
            Menu::new(
                NaiveDate::from_ymd_opt(2024, 1, 9).unwrap(),
                vec![
                    Meal::new("Curry", 390).unwrap(),
                    Meal::new("Rice, plain", 120).unwrap(),
                ],
            )
            .unwrap(),
            Menu::new(
                NaiveDate::from_ymd_opt(2024, 1, 8).unwrap(),
                vec![Meal::new("Soup", 150).unwrap()],
            )
            .unwrap(),
        ];

        let mut buffer = Vec::new();
        let rows = write_meal_table(&menus, &mut buffer).unwrap();

        assert_eq!(rows, 3);
        assert_eq!(
            String::from_utf8(buffer).unwrap(),
            "date,name,price_in_cent,price\n\
             2024-01-09,Curry,390,\"3,90€\"\n\
             2024-01-09,\"Rice, plain\",120,\"1,20€\"\n\
             2024-01-08,Soup,150,\"1,50€\"\n"
        );
    }
}
