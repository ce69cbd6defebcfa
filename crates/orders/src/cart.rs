use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use tintaria_catalog::ProductCatalog;
use tintaria_core::{
    Aggregate, AggregateRoot, DomainError, DomainResult, OrderId, PartyId, ProductCode,
};
use tintaria_events::Event;

/// One product's entry in a cart: quantity plus per-line discount percent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    pub code: ProductCode,
    pub quantity: u32,
    pub discount: f64,
}

/// Aggregate root: Cart (the order currently being composed).
///
/// Lines are kept in insertion order so report output is deterministic. The
/// cart holds a shared handle to the product catalog: every line mutation is
/// validated against it (unknown codes, packaging multiples) before any state
/// changes, so a rejected command never leaves the cart half-mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct Cart {
    id: OrderId,
    catalog: Arc<ProductCatalog>,
    lines: Vec<CartLine>,
    transporter: Option<PartyId>,
    finished: bool,
    version: u64,
}

impl Cart {
    /// Open an empty cart for a new order session.
    pub fn open(id: OrderId, catalog: Arc<ProductCatalog>) -> Self {
        Self {
            id,
            catalog,
            lines: Vec::new(),
            transporter: None,
            finished: false,
            version: 0,
        }
    }

    pub fn id_typed(&self) -> OrderId {
        self.id
    }

    pub fn catalog(&self) -> &ProductCatalog {
        &self.catalog
    }

    /// Lines in insertion order. Restartable: each call iterates from the top.
    pub fn lines(&self) -> impl Iterator<Item = &CartLine> {
        self.lines.iter()
    }

    pub fn line(&self, code: &ProductCode) -> Option<&CartLine> {
        self.lines.iter().find(|l| &l.code == code)
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn transporter(&self) -> Option<PartyId> {
        self.transporter
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

impl AggregateRoot for Cart {
    type Id = OrderId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

/// Command: AddLine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddLine {
    pub order_id: OrderId,
    pub code: ProductCode,
    pub quantity: u32,
    pub discount: f64,
    pub occurred_at: DateTime<Utc>,
}

/// Command: RemoveLine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoveLine {
    pub order_id: OrderId,
    pub code: ProductCode,
    pub occurred_at: DateTime<Utc>,
}

/// Command: SetQuantity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetQuantity {
    pub order_id: OrderId,
    pub code: ProductCode,
    pub quantity: u32,
    pub occurred_at: DateTime<Utc>,
}

/// Command: SetDiscount.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetDiscount {
    pub order_id: OrderId,
    pub code: ProductCode,
    pub discount: f64,
    pub occurred_at: DateTime<Utc>,
}

/// Command: SetTransport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetTransport {
    pub order_id: OrderId,
    pub transporter: PartyId,
    pub occurred_at: DateTime<Utc>,
}

/// Command: Finish.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finish {
    pub order_id: OrderId,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CartCommand {
    AddLine(AddLine),
    RemoveLine(RemoveLine),
    SetQuantity(SetQuantity),
    SetDiscount(SetDiscount),
    SetTransport(SetTransport),
    Finish(Finish),
}

/// Event: LineAdded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineAdded {
    pub order_id: OrderId,
    pub code: ProductCode,
    pub quantity: u32,
    pub discount: f64,
    pub occurred_at: DateTime<Utc>,
}

/// Event: LineRemoved.
///
/// Carries the removed quantity/discount so callers can keep their own
/// bookkeeping without a prior read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineRemoved {
    pub order_id: OrderId,
    pub code: ProductCode,
    pub quantity: u32,
    pub discount: f64,
    pub occurred_at: DateTime<Utc>,
}

/// Event: QuantityChanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuantityChanged {
    pub order_id: OrderId,
    pub code: ProductCode,
    pub quantity: u32,
    pub occurred_at: DateTime<Utc>,
}

/// Event: DiscountChanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscountChanged {
    pub order_id: OrderId,
    pub code: ProductCode,
    pub discount: f64,
    pub occurred_at: DateTime<Utc>,
}

/// Event: TransportAssigned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransportAssigned {
    pub order_id: OrderId,
    pub transporter: PartyId,
    pub occurred_at: DateTime<Utc>,
}

/// Event: CartFinished.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartFinished {
    pub order_id: OrderId,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CartEvent {
    LineAdded(LineAdded),
    LineRemoved(LineRemoved),
    QuantityChanged(QuantityChanged),
    DiscountChanged(DiscountChanged),
    TransportAssigned(TransportAssigned),
    CartFinished(CartFinished),
}

impl Event for CartEvent {
    fn event_type(&self) -> &'static str {
        match self {
            CartEvent::LineAdded(_) => "orders.cart.line_added",
            CartEvent::LineRemoved(_) => "orders.cart.line_removed",
            CartEvent::QuantityChanged(_) => "orders.cart.quantity_changed",
            CartEvent::DiscountChanged(_) => "orders.cart.discount_changed",
            CartEvent::TransportAssigned(_) => "orders.cart.transport_assigned",
            CartEvent::CartFinished(_) => "orders.cart.finished",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            CartEvent::LineAdded(e) => e.occurred_at,
            CartEvent::LineRemoved(e) => e.occurred_at,
            CartEvent::QuantityChanged(e) => e.occurred_at,
            CartEvent::DiscountChanged(e) => e.occurred_at,
            CartEvent::TransportAssigned(e) => e.occurred_at,
            CartEvent::CartFinished(e) => e.occurred_at,
        }
    }
}

impl Aggregate for Cart {
    type Command = CartCommand;
    type Event = CartEvent;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            CartEvent::LineAdded(e) => {
                self.lines.push(CartLine {
                    code: e.code.clone(),
                    quantity: e.quantity,
                    discount: e.discount,
                });
            }
            CartEvent::LineRemoved(e) => {
                self.lines.retain(|l| l.code != e.code);
            }
            CartEvent::QuantityChanged(e) => {
                if let Some(line) = self.lines.iter_mut().find(|l| l.code == e.code) {
                    line.quantity = e.quantity;
                }
            }
            CartEvent::DiscountChanged(e) => {
                if let Some(line) = self.lines.iter_mut().find(|l| l.code == e.code) {
                    line.discount = e.discount;
                }
            }
            CartEvent::TransportAssigned(e) => {
                self.transporter = Some(e.transporter);
            }
            CartEvent::CartFinished(_) => {
                self.finished = true;
            }
        }

        // Deterministic version tracking: +1 per applied event.
        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            CartCommand::AddLine(cmd) => self.handle_add_line(cmd),
            CartCommand::RemoveLine(cmd) => self.handle_remove_line(cmd),
            CartCommand::SetQuantity(cmd) => self.handle_set_quantity(cmd),
            CartCommand::SetDiscount(cmd) => self.handle_set_discount(cmd),
            CartCommand::SetTransport(cmd) => self.handle_set_transport(cmd),
            CartCommand::Finish(cmd) => self.handle_finish(cmd),
        }
    }
}

impl Cart {
    fn ensure_order_id(&self, order_id: OrderId) -> DomainResult<()> {
        if self.id != order_id {
            return Err(DomainError::validation("order_id mismatch"));
        }
        Ok(())
    }

    fn ensure_open(&self) -> DomainResult<()> {
        if self.finished {
            return Err(DomainError::validation(
                "cart is finished; no further mutation is allowed",
            ));
        }
        Ok(())
    }

    fn validate_discount(discount: f64) -> DomainResult<()> {
        if !discount.is_finite() || !(0.0..=100.0).contains(&discount) {
            return Err(DomainError::InvalidDiscount { discount });
        }
        Ok(())
    }

    fn validate_quantity(&self, code: &ProductCode, quantity: u32) -> DomainResult<()> {
        let product = self
            .catalog
            .get(code)
            .ok_or_else(|| DomainError::UnknownProduct(code.clone()))?;
        product.weight().validate_quantity(code, quantity)
    }

    fn handle_add_line(&self, cmd: &AddLine) -> DomainResult<Vec<CartEvent>> {
        self.ensure_order_id(cmd.order_id)?;
        self.ensure_open()?;

        if self.line(&cmd.code).is_some() {
            return Err(DomainError::DuplicateLine(cmd.code.clone()));
        }
        self.validate_quantity(&cmd.code, cmd.quantity)?;
        Self::validate_discount(cmd.discount)?;

        Ok(vec![CartEvent::LineAdded(LineAdded {
            order_id: cmd.order_id,
            code: cmd.code.clone(),
            quantity: cmd.quantity,
            discount: cmd.discount,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_remove_line(&self, cmd: &RemoveLine) -> DomainResult<Vec<CartEvent>> {
        self.ensure_order_id(cmd.order_id)?;
        self.ensure_open()?;

        let line = self
            .line(&cmd.code)
            .ok_or_else(|| DomainError::LineNotFound(cmd.code.clone()))?;

        Ok(vec![CartEvent::LineRemoved(LineRemoved {
            order_id: cmd.order_id,
            code: cmd.code.clone(),
            quantity: line.quantity,
            discount: line.discount,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_set_quantity(&self, cmd: &SetQuantity) -> DomainResult<Vec<CartEvent>> {
        self.ensure_order_id(cmd.order_id)?;
        self.ensure_open()?;

        if self.line(&cmd.code).is_none() {
            return Err(DomainError::LineNotFound(cmd.code.clone()));
        }
        self.validate_quantity(&cmd.code, cmd.quantity)?;

        Ok(vec![CartEvent::QuantityChanged(QuantityChanged {
            order_id: cmd.order_id,
            code: cmd.code.clone(),
            quantity: cmd.quantity,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_set_discount(&self, cmd: &SetDiscount) -> DomainResult<Vec<CartEvent>> {
        self.ensure_order_id(cmd.order_id)?;
        self.ensure_open()?;

        if self.line(&cmd.code).is_none() {
            return Err(DomainError::LineNotFound(cmd.code.clone()));
        }
        Self::validate_discount(cmd.discount)?;

        Ok(vec![CartEvent::DiscountChanged(DiscountChanged {
            order_id: cmd.order_id,
            code: cmd.code.clone(),
            discount: cmd.discount,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_set_transport(&self, cmd: &SetTransport) -> DomainResult<Vec<CartEvent>> {
        self.ensure_order_id(cmd.order_id)?;
        // Re-assignment before Finish is allowed; the once-only decision is
        // the transporter's sender flag, not the assignment.
        self.ensure_open()?;

        Ok(vec![CartEvent::TransportAssigned(TransportAssigned {
            order_id: cmd.order_id,
            transporter: cmd.transporter,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_finish(&self, cmd: &Finish) -> DomainResult<Vec<CartEvent>> {
        self.ensure_order_id(cmd.order_id)?;
        self.ensure_open()?;

        if self.lines.is_empty() {
            return Err(DomainError::validation("cannot finish an empty cart"));
        }
        if self.transporter.is_none() {
            return Err(DomainError::validation(
                "cannot finish a cart without an assigned transporter",
            ));
        }

        Ok(vec![CartEvent::CartFinished(CartFinished {
            order_id: cmd.order_id,
            occurred_at: cmd.occurred_at,
        })])
    }
}

/// Direct mutation surface for the interactive caller.
///
/// Each method is handle-then-apply over the corresponding command, so all
/// validation still happens before any state change.
impl Cart {
    fn run(&mut self, command: CartCommand) -> DomainResult<Vec<CartEvent>> {
        let events = self.handle(&command)?;
        for event in &events {
            self.apply(event);
        }
        Ok(events)
    }

    pub fn add_line(&mut self, code: ProductCode, quantity: u32, discount: f64) -> DomainResult<()> {
        self.run(CartCommand::AddLine(AddLine {
            order_id: self.id,
            code,
            quantity,
            discount,
            occurred_at: Utc::now(),
        }))?;
        Ok(())
    }

    /// Remove a line, returning its `(quantity, discount)` pair.
    pub fn remove_line(&mut self, code: &ProductCode) -> DomainResult<(u32, f64)> {
        let events = self.run(CartCommand::RemoveLine(RemoveLine {
            order_id: self.id,
            code: code.clone(),
            occurred_at: Utc::now(),
        }))?;
        match events.into_iter().next() {
            Some(CartEvent::LineRemoved(e)) => Ok((e.quantity, e.discount)),
            _ => Err(DomainError::validation(
                "remove_line produced no LineRemoved event",
            )),
        }
    }

    pub fn set_quantity(&mut self, code: &ProductCode, quantity: u32) -> DomainResult<()> {
        self.run(CartCommand::SetQuantity(SetQuantity {
            order_id: self.id,
            code: code.clone(),
            quantity,
            occurred_at: Utc::now(),
        }))?;
        Ok(())
    }

    pub fn set_discount(&mut self, code: &ProductCode, discount: f64) -> DomainResult<()> {
        self.run(CartCommand::SetDiscount(SetDiscount {
            order_id: self.id,
            code: code.clone(),
            discount,
            occurred_at: Utc::now(),
        }))?;
        Ok(())
    }

    pub fn set_transport(&mut self, transporter: PartyId) -> DomainResult<()> {
        self.run(CartCommand::SetTransport(SetTransport {
            order_id: self.id,
            transporter,
            occurred_at: Utc::now(),
        }))?;
        Ok(())
    }

    pub fn finish(&mut self) -> DomainResult<()> {
        self.run(CartCommand::Finish(Finish {
            order_id: self.id,
            occurred_at: Utc::now(),
        }))?;
        Ok(())
    }
}
