//! Stdin/stdout collaborator used by the binary. Parse failures re-prompt
//! locally; the session core never sees malformed text.

use std::io::{self, Write};

use crate::client::Interface;
use crate::config::vessel_name;

pub struct ConsoleInterface;

impl ConsoleInterface {
    fn read_line(prompt: &str) -> String {
        print!("{}", prompt);
        let _ = io::stdout().flush();
        let mut line = String::new();
        if io::stdin().read_line(&mut line).is_err() {
            return String::new();
        }
        line.trim().to_string()
    }
}

impl Interface for ConsoleInterface {
    fn request_placement(&mut self, name: &str, length: usize) -> (i32, i32, String) {
        loop {
            let line = Self::read_line(&format!(
                "{}, place your {} (length {}) as `row col direction`: ",
                name,
                vessel_name(length),
                length
            ));
            let mut parts = line.split_whitespace();
            let row = parts.next().and_then(|t| t.parse::<i32>().ok());
            let col = parts.next().and_then(|t| t.parse::<i32>().ok());
            let direction = parts.next();
            match (row, col, direction, parts.next()) {
                (Some(row), Some(col), Some(direction), None) => {
                    return (row, col, direction.to_string())
                }
                _ => println!("Enter a row, a column, and a direction, e.g. `0 0 east`."),
            }
        }
    }

    fn request_target(&mut self, name: &str) -> (i32, i32) {
        loop {
            let line = Self::read_line(&format!("{}, pick a target as `row col`: ", name));
            let mut parts = line.split_whitespace();
            let row = parts.next().and_then(|t| t.parse::<i32>().ok());
            let col = parts.next().and_then(|t| t.parse::<i32>().ok());
            match (row, col, parts.next()) {
                (Some(row), Some(col), None) => return (row, col),
                _ => println!("Enter a row and a column, e.g. `4 7`."),
            }
        }
    }

    fn message(&mut self, text: &str) {
        println!("{}", text);
    }
}
