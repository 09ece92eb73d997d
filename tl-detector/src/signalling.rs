// Copyright 2025 Accenture.
//
// SPDX-License-Identifier: Apache-2.0

//! Intra-process channels between feeds, the runner and consumers

use crate::error::Error::{self, Channel};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::time::Duration;

pub trait Receiver<T>: Send {
    fn recv(&mut self) -> Result<T>;
}

pub trait Sender<T>: Send {
    fn send(&mut self, t: T) -> Result<()>;
}

pub fn channel<T>() -> (IntraProcSender<T>, IntraProcReceiver<T>) {
    let (sender, receiver) = mpsc::channel();
    (
        IntraProcSender::new(sender),
        IntraProcReceiver::new(receiver),
    )
}

pub struct IntraProcReceiver<T> {
    receiver: mpsc::Receiver<T>,
}

impl<T> IntraProcReceiver<T> {
    pub fn new(mpsc_rec: mpsc::Receiver<T>) -> IntraProcReceiver<T> {
        IntraProcReceiver { receiver: mpsc_rec }
    }

    /// Wait at most `timeout` for the next value, `None` if nothing arrived in time
    pub fn recv_timeout(&mut self, timeout: Duration) -> Result<Option<T>> {
        match self.receiver.recv_timeout(timeout) {
            Ok(t) => Ok(Some(t)),
            Err(RecvTimeoutError::Timeout) => Ok(None),
            Err(RecvTimeoutError::Disconnected) => Err(Channel("sender disconnected")),
        }
    }

    /// Return all values received so far without blocking
    pub fn drain(&mut self) -> Vec<T> {
        self.receiver.try_iter().collect()
    }
}

impl<T: Send> Receiver<T> for IntraProcReceiver<T> {
    fn recv(&mut self) -> Result<T> {
        self.receiver
            .recv()
            .map_err(|_| Channel("failed to receive"))
    }
}

pub struct IntraProcSender<T> {
    sender: mpsc::Sender<T>,
}

impl<T> IntraProcSender<T> {
    pub fn new(mpsc_snd: mpsc::Sender<T>) -> IntraProcSender<T> {
        IntraProcSender { sender: mpsc_snd }
    }
}

impl<T> Clone for IntraProcSender<T> {
    fn clone(&self) -> IntraProcSender<T> {
        IntraProcSender {
            sender: self.sender.clone(),
        }
    }
}

impl<T: Send> Sender<T> for IntraProcSender<T> {
    fn send(&mut self, t: T) -> Result<()> {
        self.sender.send(t).map_err(|_| Channel("failed to send"))
    }
}

type Result<T, E = Error> = std::result::Result<T, E>;
