//! Interactive menu loop
//!
//! One blocking read-eval loop: show the menu, read a choice, collect the
//! fields that choice needs, make one store call, print the outcome.

use std::io::{self, BufRead, Write};

use studentctl_core::{StoreError, Student, StudentStore};
use tracing::debug;

use crate::console::{Console, PromptError};

const MENU: &str = "\n==== Student Management System ====\n\
                    1. Add Student\n\
                    2. Display All Students\n\
                    3. Search Student by ID\n\
                    4. Update Student\n\
                    5. Delete Student\n\
                    6. Exit";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Add,
    List,
    Search,
    Update,
    Delete,
    Exit,
}

impl MenuChoice {
    pub fn from_number(n: i64) -> Option<Self> {
        match n {
            1 => Some(Self::Add),
            2 => Some(Self::List),
            3 => Some(Self::Search),
            4 => Some(Self::Update),
            5 => Some(Self::Delete),
            6 => Some(Self::Exit),
            _ => None,
        }
    }
}

pub struct Shell<'a, R, W> {
    store: &'a dyn StudentStore,
    console: Console<R, W>,
}

impl<'a, R: BufRead, W: Write> Shell<'a, R, W> {
    pub fn new(store: &'a dyn StudentStore, console: Console<R, W>) -> Self {
        Self { store, console }
    }

    /// Run until Exit is chosen or input ends.
    ///
    /// Only console I/O failures end the loop with an error; store errors
    /// and malformed input are reported and the menu comes back.
    pub async fn run(&mut self) -> io::Result<()> {
        loop {
            self.console.say(MENU)?;

            let choice = match self.console.prompt_text("Enter choice: ") {
                Ok(raw) => raw,
                Err(PromptError::Io(e)) => return Err(e),
                Err(_) => break,
            };

            let choice = match choice.parse::<i64>() {
                Ok(n) => match MenuChoice::from_number(n) {
                    Some(choice) => choice,
                    None => {
                        self.console.say("Invalid choice.")?;
                        continue;
                    }
                },
                Err(_) => {
                    self.console.say("Please enter a number.")?;
                    continue;
                }
            };

            debug!(?choice, "menu selection");
            if choice == MenuChoice::Exit {
                break;
            }

            match self.dispatch(choice).await {
                Ok(()) => {}
                Err(PromptError::TooManyAttempts { .. }) => self
                    .console
                    .say("Too many invalid entries, returning to menu.")?,
                Err(PromptError::Closed) => break,
                Err(PromptError::Io(e)) => return Err(e),
            }
        }

        self.console.say("Goodbye!")
    }

    #[cfg(test)]
    pub fn into_console(self) -> Console<R, W> {
        self.console
    }

    async fn dispatch(&mut self, choice: MenuChoice) -> Result<(), PromptError> {
        match choice {
            MenuChoice::Add => self.add_student().await,
            MenuChoice::List => self.display_all().await,
            MenuChoice::Search => self.search_student().await,
            MenuChoice::Update => self.update_student().await,
            MenuChoice::Delete => self.delete_student().await,
            MenuChoice::Exit => Ok(()),
        }
    }

    async fn add_student(&mut self) -> Result<(), PromptError> {
        let id = self.console.prompt_int("Enter ID: ", "id")?;
        let name = self.console.prompt_text("Enter Name: ")?;
        let age = self.console.prompt_int("Enter Age: ", "age")?;
        let course = self.console.prompt_text("Enter Course: ")?;

        let student = Student::new(id, name, age, course);
        match self.store.add(&student).await {
            Ok(()) => self.console.say("Student added to DB.")?,
            Err(e) => self.report(&e)?,
        }
        Ok(())
    }

    async fn display_all(&mut self) -> Result<(), PromptError> {
        match self.store.list_all().await {
            Ok(students) if students.is_empty() => self.console.say("No records found.")?,
            Ok(students) => {
                for student in &students {
                    self.console.say(student)?;
                }
            }
            Err(e) => self.report(&e)?,
        }
        Ok(())
    }

    async fn search_student(&mut self) -> Result<(), PromptError> {
        let id = self.console.prompt_int("Enter ID to search: ", "id")?;

        match self.store.find_by_id(id).await {
            Ok(Some(student)) => self.console.say(student)?,
            Ok(None) => self.console.say("Student not found.")?,
            Err(e) => self.report(&e)?,
        }
        Ok(())
    }

    async fn update_student(&mut self) -> Result<(), PromptError> {
        let id = self.console.prompt_int("Enter ID to update: ", "id")?;

        // Look up first so the user is not asked for fields of a missing record
        let mut student = match self.store.find_by_id(id).await {
            Ok(Some(student)) => student,
            Ok(None) => {
                self.console.say("Student not found.")?;
                return Ok(());
            }
            Err(e) => {
                self.report(&e)?;
                return Ok(());
            }
        };

        student.name = self.console.prompt_text("Enter new Name: ")?;
        student.age = self.console.prompt_int("Enter new Age: ", "age")?;
        student.course = self.console.prompt_text("Enter new Course: ")?;

        match self.store.update(&student).await {
            Ok(()) => self.console.say("Student updated.")?,
            Err(e) => self.report(&e)?,
        }
        Ok(())
    }

    async fn delete_student(&mut self) -> Result<(), PromptError> {
        let id = self.console.prompt_int("Enter ID to delete: ", "id")?;

        match self.store.delete(id).await {
            Ok(()) => self.console.say("Student deleted.")?,
            Err(e) => self.report(&e)?,
        }
        Ok(())
    }

    fn report(&mut self, err: &StoreError) -> io::Result<()> {
        match err {
            StoreError::Duplicate { id } => self
                .console
                .say(format!("A student with ID {id} already exists.")),
            StoreError::NotFound { .. } => self.console.say("Student not found."),
            StoreError::Connection { .. } | StoreError::Query { .. } => {
                self.console.say(format!("Error: {err}"))
            }
        }
    }
}
