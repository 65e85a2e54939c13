// Copyright 2020 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

//! A `bee_common`-style shutdown accumulator, simplified for a node with no background workers:
//! just a list of teardown actions (closing databases) run in registration order, keeping the
//! first error instead of only logging it.

type Action = Box<dyn FnOnce() -> Result<(), String> + Send>;

#[derive(Default)]
pub struct Shutdown {
    actions: Vec<Action>,
}

impl Shutdown {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_action(&mut self, action: impl FnOnce() -> Result<(), String> + Send + 'static) {
        self.actions.push(Box::new(action));
    }

    /// Runs every registered action in registration order, returning the first error, if any,
    /// after all actions have still been attempted.
    pub fn execute(self) -> Result<(), String> {
        let mut first_error = None;
        for action in self.actions {
            if let Err(e) = action() {
                if first_error.is_none() {
                    first_error = Some(e);
                }
            }
        }
        first_error.map_or(Ok(()), Err)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;

    #[test]
    fn runs_actions_in_registration_order() {
        let order = Arc::new(Mutex::new(Vec::new()));
        let mut shutdown = Shutdown::new();

        for i in 0..3 {
            let order = Arc::clone(&order);
            shutdown.add_action(move || {
                order.lock().unwrap().push(i);
                Ok(())
            });
        }

        shutdown.execute().unwrap();
        assert_eq!(*order.lock().unwrap(), vec![0, 1, 2]);
    }

    #[test]
    fn keeps_the_first_error_but_still_runs_the_rest() {
        let ran_third = Arc::new(Mutex::new(false));
        let mut shutdown = Shutdown::new();

        shutdown.add_action(|| Err("first failure".to_owned()));
        shutdown.add_action(|| Err("second failure".to_owned()));
        {
            let ran_third = Arc::clone(&ran_third);
            shutdown.add_action(move || {
                *ran_third.lock().unwrap() = true;
                Ok(())
            });
        }

        let err = shutdown.execute().unwrap_err();
        assert_eq!(err, "first failure");
        assert!(*ran_third.lock().unwrap());
    }
}
