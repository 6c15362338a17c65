//! Terminal rendition of the submission form: one prompt per field,
//! re-asking until each answer is acceptable.

use rust_decimal::Decimal;
use std::io::{self, BufRead, Write};

use cvp_core::form::{FormSubmission, ProductEntry, SupplierEntry};

pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Prompter { input, output }
    }

    /// Walk through every field of the form and return the full submission.
    pub fn collect(&mut self) -> io::Result<FormSubmission> {
        self.heading("Company Details")?;
        let company_name = self.ask_text("Enter Company's Name")?;
        let product_count = self.ask_count("Enter number of products")?;
        let fixed_cost = self.ask_amount("Enter total fixed cost")?;

        self.heading("Enter Product Details")?;
        let mut products = Vec::with_capacity(product_count);
        for i in 1..=product_count {
            writeln!(self.output, "Product {} Details", i)?;
            products.push(ProductEntry {
                name: self.ask_text(&format!("Name of product {}", i))?,
                selling_price: self.ask_amount(&format!("Selling price of product {}", i))?,
                variable_cost: self.ask_amount(&format!("Variable cost of product {}", i))?,
            });
        }

        self.heading("Supplier Evaluation")?;
        let supplier = SupplierEntry {
            standard_price: self.ask_amount("Enter standard material price")?,
            actual_price: self.ask_amount("Enter actual material price")?,
            actual_quantity: self.ask_amount("Enter actual quantity purchased")?,
        };

        Ok(FormSubmission {
            company_name,
            product_count: Some(product_count),
            fixed_cost,
            products,
            supplier,
        })
    }

    fn heading(&mut self, title: &str) -> io::Result<()> {
        writeln!(self.output)?;
        writeln!(self.output, "{}", title)
    }

    fn ask(&mut self, label: &str) -> io::Result<String> {
        write!(self.output, "{}: ", label)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "input ended before the form was complete",
            ));
        }
        Ok(line.trim().to_string())
    }

    fn ask_text(&mut self, label: &str) -> io::Result<String> {
        loop {
            let answer = self.ask(label)?;
            if !answer.is_empty() {
                return Ok(answer);
            }
            writeln!(self.output, "  A value is required.")?;
        }
    }

    fn ask_count(&mut self, label: &str) -> io::Result<usize> {
        loop {
            match self.ask(label)?.parse::<usize>() {
                Ok(n) if n >= 1 => return Ok(n),
                _ => writeln!(self.output, "  Enter a whole number of at least 1.")?,
            }
        }
    }

    fn ask_amount(&mut self, label: &str) -> io::Result<Decimal> {
        loop {
            match self.ask(label)?.parse::<Decimal>() {
                Ok(v) if v.is_sign_negative() && !v.is_zero() => {
                    writeln!(self.output, "  The value must not be negative.")?
                }
                Ok(v) => return Ok(v),
                Err(_) => writeln!(self.output, "  Enter a number.")?,
            }
        }
    }
}
