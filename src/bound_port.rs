//! The test harness launches the server on port 0 and needs to learn which
//! port the OS actually handed out. A liftoff fairing reports it through a
//! channel; `BoundPort::get` caches the answer for repeated lookups.

use rocket::fairing::Info;
use rocket::{Orbit, Rocket};
use std::sync::Mutex;
use tokio::sync::mpsc;

pub fn create_pair() -> (PortReporter, BoundPort) {
    let (tx, rx) = mpsc::channel(1);
    (PortReporter { sender: tx }, BoundPort::new(rx))
}

pub struct BoundPort {
    port: Mutex<Option<u16>>,
    rx: Mutex<mpsc::Receiver<u16>>,
}

impl BoundPort {
    fn new(rx: mpsc::Receiver<u16>) -> BoundPort {
        BoundPort {
            port: Mutex::new(None),
            rx: Mutex::new(rx),
        }
    }

    pub async fn get(&self) -> u16 {
        let mut port_guard = self.port.lock().unwrap();
        match *port_guard {
            Some(port) => port,
            None => {
                let mut rx_guard = self.rx.lock().unwrap();
                let port = rx_guard.recv().await.unwrap();
                *port_guard = Some(port);
                port
            }
        }
    }
}

pub struct PortReporter {
    sender: mpsc::Sender<u16>,
}

#[rocket::async_trait]
impl rocket::fairing::Fairing for PortReporter {
    fn info(&self) -> Info {
        Info {
            name: "Port Reporter",
            kind: rocket::fairing::Kind::Liftoff,
        }
    }

    async fn on_liftoff(&self, rocket: &Rocket<Orbit>) {
        self.sender.send(rocket.config().port).await.unwrap();
    }
}
