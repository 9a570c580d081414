//! Interactive collection of calculation inputs.
//!
//! Everything here runs before the calculation core is called. The core
//! never blocks on the operator; it only sees the resolved values.

use std::io::{BufRead, Write};

use anyhow::{bail, Context, Result};

use mga_assay::{InjectionSet, PairingMode, SampleInputs};

/// Line-based question/answer helper over any reader and writer
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn read_answer(&mut self) -> Result<String> {
        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .context("Failed to read operator input")?;
        if read == 0 {
            bail!("Input closed while waiting for an answer");
        }
        Ok(line.trim().to_string())
    }

    fn say(&mut self, text: &str) -> Result<()> {
        writeln!(self.output, "{}", text)?;
        self.output.flush()?;
        Ok(())
    }

    /// Ask for a number, repeating the question until one is entered
    pub fn ask_number(&mut self, question: &str) -> Result<f64> {
        self.say(question)?;
        loop {
            let answer = self.read_answer()?;
            match answer.parse::<f64>() {
                Ok(value) if value.is_finite() => return Ok(value),
                _ => {
                    write!(self.output, "Invalid input. Try again: ")?;
                    self.output.flush()?;
                }
            }
        }
    }

    /// Ask for a number above zero, repeating the question otherwise
    pub fn ask_positive_number(&mut self, question: &str) -> Result<f64> {
        let mut value = self.ask_number(question)?;
        while value <= 0.0 {
            value = self.ask_number("The value must be greater than zero. Try again:")?;
        }
        Ok(value)
    }

    /// Offer a lettered menu.
    ///
    /// Returns the chosen letter (lowercase), or `None` if the answer matches
    /// no option.
    pub fn ask_choice(&mut self, question: &str, options: &[(char, &str)]) -> Result<Option<char>> {
        self.say(question)?;
        for (key, label) in options {
            self.say(&format!("{}. {}", key.to_ascii_uppercase(), label))?;
        }
        self.say("press any other key to exit")?;

        let answer = self.read_answer()?;
        let choice = answer.chars().next().map(|c| c.to_ascii_lowercase());
        Ok(choice.filter(|c| options.iter().any(|(key, _)| key.to_ascii_lowercase() == *c)))
    }

    /// Ask a yes/no question until a valid answer is given
    pub fn ask_yes_no(&mut self, question: &str) -> Result<bool> {
        loop {
            self.say(question)?;
            self.say("Y. Yes")?;
            self.say("N. No")?;
            match self.read_answer()?.chars().next().map(|c| c.to_ascii_lowercase()) {
                Some('y') => return Ok(true),
                Some('n') => return Ok(false),
                _ => self.say("Invalid input.")?,
            }
        }
    }
}

/// Outcome of a menu that can be declined
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Continue,
    Exit,
}

/// Interactive collector for the values the export does not carry
pub struct InputCollector<R, W> {
    prompter: Prompter<R, W>,
}

impl<R: BufRead, W: Write> InputCollector<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            prompter: Prompter::new(input, output),
        }
    }

    /// Weight menu shown when the export has no weight column
    pub fn weights(&mut self, injections: &InjectionSet, inputs: &mut SampleInputs) -> Result<Step> {
        let choice = self.prompter.ask_choice(
            "No weights info detected in exported files. Would you want to:",
            &[
                ('a', "manually enter them here"),
                ('b', "calculate using a default value of 1.0 g"),
            ],
        )?;
        match choice {
            Some('a') => {
                for sample in injections.unknowns() {
                    let weight = self.prompter.ask_number(&format!(
                        "Please enter sample weight in grams:\nsample: {}",
                        sample.name
                    ))?;
                    inputs.set_weight(sample.name.clone(), weight);
                }
                Ok(Step::Continue)
            }
            Some('b') => {
                inputs.default_weight = Some(1.0);
                Ok(Step::Continue)
            }
            _ => Ok(Step::Exit),
        }
    }

    /// Dilution menu shown when the export has no dilution column
    pub fn dilutions(&mut self, injections: &InjectionSet, inputs: &mut SampleInputs) -> Result<Step> {
        let choice = self.prompter.ask_choice(
            "No dilution info detected in exported files. Would you want to:",
            &[
                ('a', "manually enter them here"),
                ('b', "calculate using a default value of 1"),
                ('c', "calculate using a custom default value"),
            ],
        )?;
        match choice {
            Some('a') => {
                for sample in injections.unknowns() {
                    let dilution = self.prompter.ask_number(&format!(
                        "Please enter dilution factor for sample {}",
                        sample.name
                    ))?;
                    inputs.set_dilution(sample.name.clone(), dilution);
                }
                Ok(Step::Continue)
            }
            Some('b') => {
                inputs.default_dilution = Some(1.0);
                Ok(Step::Continue)
            }
            Some('c') => {
                let dilution = self
                    .prompter
                    .ask_number("Please enter the default dilution factor")?;
                inputs.default_dilution = Some(dilution);
                Ok(Step::Continue)
            }
            _ => Ok(Step::Exit),
        }
    }

    pub fn standard_concentration(&mut self) -> Result<f64> {
        self.prompter
            .ask_positive_number("Please enter standard concentration in ppb")
    }

    /// Ask whether to compute recoveries; returns the expected potency if so
    pub fn recovery(&mut self) -> Result<Option<f64>> {
        if self
            .prompter
            .ask_yes_no("Would you want to calculate recoveries?")?
        {
            let potency = self
                .prompter
                .ask_positive_number("Please enter expected sample potency in ppb")?;
            Ok(Some(potency))
        } else {
            Ok(None)
        }
    }

    /// Ask whether to average duplicate injections
    pub fn averaging(&mut self, default_mode: PairingMode) -> Result<Option<PairingMode>> {
        let question = match default_mode {
            PairingMode::Positional => {
                "Would you want to calculate average for duplicate injections?\n\
                 Note: consecutive samples are paired, so duplicate injections must be adjacent in the export"
            }
            PairingMode::ByName => {
                "Would you want to calculate average for duplicate injections?\n\
                 Note: duplicate injections need identical names other than the injection number,\n\
                 e.g. <<sampleName INJ1>> and <<sampleName INJ2>>"
            }
        };
        Ok(self.prompter.ask_yes_no(question)?.then_some(default_mode))
    }
}
