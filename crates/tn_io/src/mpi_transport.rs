//! Production `Transport` backed by the real `mpi` crate (rsmpi). Behind
//! the non-default `mpi` feature; not exercised by this workspace's
//! tests, which run entirely over [`crate::transport::LoopbackTransport`].

use std::collections::HashMap;

use mpi::point_to_point as p2p;
use mpi::request::{LocalScope, Request};
use mpi::topology::{Communicator, SimpleCommunicator};
use mpi::traits::*;

use tn_core::Rank;

use crate::error::{Error, Result};
use crate::transport::{Completion, RequestId, Tag, Transport};

/// Wraps a `mpi::topology::SimpleCommunicator`. Non-blocking requests are
/// tracked by id because rsmpi's `Request` borrows the send/recv buffer
/// for its lifetime; this wrapper owns the buffers so the borrow outlives
/// the call.
pub struct MpiTransport<'s> {
    comm: SimpleCommunicator,
    scope: &'s LocalScope<'s>,
    next_id: usize,
    sends: HashMap<usize, (Vec<i64>, Request<'s, [i64]>)>,
    recvs: HashMap<usize, (Vec<i64>, Request<'s, [i64]>)>,
}

impl<'s> MpiTransport<'s> {
    pub fn new(comm: SimpleCommunicator, scope: &'s LocalScope<'s>) -> Self {
        Self {
            comm,
            scope,
            next_id: 0,
            sends: HashMap::new(),
            recvs: HashMap::new(),
        }
    }

    fn alloc_id(&mut self) -> RequestId {
        let id = self.next_id;
        self.next_id += 1;
        RequestId(id)
    }
}

impl<'s> Transport for MpiTransport<'s> {
    fn rank(&self) -> Rank {
        Rank(self.comm.rank())
    }

    fn size(&self) -> i32 {
        self.comm.size()
    }

    fn allgather(&mut self, local: i64) -> Result<Vec<i64>> {
        let mut out = vec![0i64; self.size() as usize];
        self.comm.all_gather_into(&local, &mut out[..]);
        Ok(out)
    }

    fn bcast(&mut self, local: i64, root: Rank) -> Result<i64> {
        let mut value = local;
        self.comm
            .process_at_rank(root.0)
            .broadcast_into(&mut value);
        Ok(value)
    }

    fn isend(&mut self, dest: Rank, tag: Tag, payload: Vec<i64>) -> Result<RequestId> {
        if payload.len() > i32::MAX as usize {
            return Err(Error::Overflow);
        }
        let id = self.alloc_id();
        // Safety/ownership note: the boxed payload is kept alive in
        // `self.sends` for as long as the request is outstanding; rsmpi's
        // immediate send borrows it for that duration via `self.scope`.
        let dest_process = self.comm.process_at_rank(dest.0);
        let buf: Vec<i64> = payload;
        let req = unsafe {
            std::mem::transmute::<Request<'_, [i64]>, Request<'s, [i64]>>(
                dest_process.immediate_send_with_tag(self.scope, &buf[..], tag as i32),
            )
        };
        self.sends.insert(id.0, (buf, req));
        Ok(id)
    }

    fn irecv(&mut self, source: Rank, tag: Tag, count: usize) -> Result<RequestId> {
        let id = self.alloc_id();
        let mut buf = vec![0i64; count];
        let source_process = self.comm.process_at_rank(source.0);
        let req = unsafe {
            std::mem::transmute::<Request<'_, [i64]>, Request<'s, [i64]>>(
                source_process.immediate_receive_into_with_tag(self.scope, &mut buf[..], tag as i32),
            )
        };
        self.recvs.insert(id.0, (buf, req));
        Ok(id)
    }

    fn waitsome(&mut self, requests: &[RequestId]) -> Result<Vec<(RequestId, Completion)>> {
        let mut out = Vec::new();
        for &rid in requests {
            if let Some((_, req)) = self.sends.remove(&rid.0) {
                // A completed send has no payload to surface.
                let _ = p2p::test(req);
                out.push((rid, Completion::Send));
            } else if let Some((buf, req)) = self.recvs.remove(&rid.0) {
                match p2p::test(req) {
                    Ok(_status) => out.push((rid, Completion::Recv(buf))),
                    Err(req) => {
                        self.recvs.insert(rid.0, (buf, req));
                    }
                }
            }
        }
        Ok(out)
    }
}
